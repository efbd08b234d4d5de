use std::fmt;

use crate::util::{bill::Amount, recurrence::Due, slot::SlotId};

/// One reminder (or the absence of one) for a bill
#[derive(Debug, Clone)]
pub struct Line {
    pub slot: SlotId,
    pub name: String,
    pub amount: Option<Amount>,
    /// `None` for rules that are paused or muted
    pub due: Option<Due>,
}

pub struct Table<'d> {
    title: Option<String>,
    data: &'d [Line],
}

struct BoxFmt {
    width: usize,
    text: String,
}

struct ColFmt {
    width: usize,
    label: BoxFmt,
    boxes: Vec<BoxFmt>,
}

struct GridFmt {
    labels: ColFmt,
    columns: Vec<ColFmt>,
}

const HEADERS: [&str; 4] = ["Slot", "Bill", "Due", "Amount"];

impl<'d> Table<'d> {
    pub fn from(data: &'d [Line]) -> Self {
        Self { title: None, data }
    }

    pub fn with_title<S>(mut self, title: S) -> Self
    where
        S: ToString,
    {
        self.title = Some(title.to_string());
        self
    }

    fn to_formatter(&self) -> GridFmt {
        let cols = HEADERS
            .iter()
            .map(|h| ColFmt::with_label(BoxFmt::from(h.to_string())))
            .collect::<Vec<_>>();
        let mut grid = GridFmt::with_columns(BoxFmt::from(String::from("Reminder")), cols);
        let mut total = Amount::default();
        for line in self.data {
            if line.due.is_some() {
                total += line.amount.unwrap_or_default();
            }
            grid.push_line(
                BoxFmt::reminder(line.due),
                vec![
                    BoxFmt::from(format!("{}", line.slot)),
                    BoxFmt::from(line.name.clone()),
                    BoxFmt::occurrence(line.due),
                    BoxFmt::amount(line.amount),
                ],
            );
        }
        grid.push_line(
            BoxFmt::from(String::from("Total")),
            vec![
                BoxFmt::from(String::new()),
                BoxFmt::from(String::new()),
                BoxFmt::from(String::new()),
                BoxFmt::amount(Some(total)),
            ],
        );
        grid
    }
}

impl BoxFmt {
    fn from(text: String) -> Self {
        let width = text.chars().count();
        Self { text, width }
    }

    fn amount(a: Option<Amount>) -> Self {
        match a {
            Some(a) if a.0 != 0 => Self::from(format!("{}", a)),
            _ => Self::from(String::new()),
        }
    }

    fn reminder(due: Option<Due>) -> Self {
        match due {
            Some(due) => Self::from(format!("{}", due.at)),
            None => Self::from(String::from("-")),
        }
    }

    fn occurrence(due: Option<Due>) -> Self {
        match due {
            Some(due) => Self::from(format!("{}", due.occurrence)),
            None => Self::from(String::from("off")),
        }
    }
}

impl ColFmt {
    fn with_label(label: BoxFmt) -> Self {
        Self {
            width: label.width,
            label,
            boxes: Vec::new(),
        }
    }

    fn push(&mut self, b: BoxFmt) {
        self.width = self.width.max(b.width);
        self.boxes.push(b);
    }
}

impl GridFmt {
    fn with_columns(label: BoxFmt, columns: Vec<ColFmt>) -> Self {
        Self {
            labels: ColFmt::with_label(label),
            columns,
        }
    }

    fn push_line(&mut self, label: BoxFmt, boxes: Vec<BoxFmt>) {
        self.labels.push(label);
        for (i, b) in boxes.into_iter().enumerate() {
            self.columns[i].push(b);
        }
    }
}

impl fmt::Display for Table<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if let Some(title) = &self.title {
            writeln!(f, " {}", title)?;
        }
        write!(f, "{}", self.to_formatter())
    }
}

impl fmt::Display for GridFmt {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        // upper border
        write!(f, "{}", ULCORNER)?;
        self.labels.hline(f)?;
        for c in &self.columns {
            write!(f, "{}", LOJOIN)?;
            c.hline(f)?;
        }
        writeln!(f, "{}", URCORNER)?;
        // title line
        write!(f, "{}", VLINE)?;
        self.labels.write_label(f)?;
        for c in &self.columns {
            write!(f, "{}", VLINE)?;
            c.write_label(f)?;
        }
        writeln!(f, "{}", VLINE)?;
        // separator
        write!(f, "{}", RTJOIN)?;
        self.labels.hline(f)?;
        for c in &self.columns {
            write!(f, "{}", CROSS)?;
            c.hline(f)?;
        }
        writeln!(f, "{}", LTJOIN)?;

        // main block
        for idx in 0..self.labels.len() {
            write!(f, "{}", VLINE)?;
            self.labels.write_item(f, idx, false)?;
            for c in &self.columns {
                write!(f, "{}", VLINE)?;
                c.write_item(f, idx, true)?;
            }
            writeln!(f, "{}", VLINE)?;
        }
        // lower border
        write!(f, "{}", DLCORNER)?;
        self.labels.hline(f)?;
        for c in &self.columns {
            write!(f, "{}", HIJOIN)?;
            c.hline(f)?;
        }
        writeln!(f, "{}", DRCORNER)?;
        Ok(())
    }
}

impl ColFmt {
    fn write_label(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.label.write(f, self.width, true)
    }

    fn write_item(&self, f: &mut fmt::Formatter, idx: usize, right: bool) -> fmt::Result {
        self.boxes[idx].write(f, self.width, right)
    }

    fn len(&self) -> usize {
        self.boxes.len()
    }

    fn hline(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", HLINE.repeat(self.width + 2))
    }
}

const HLINE: &str = "─";
const VLINE: &str = "│";
const ULCORNER: &str = "┌";
const URCORNER: &str = "┐";
const DLCORNER: &str = "└";
const DRCORNER: &str = "┘";
const LTJOIN: &str = "┤";
const RTJOIN: &str = "├";
const HIJOIN: &str = "┴";
const LOJOIN: &str = "┬";
const CROSS: &str = "┼";

impl BoxFmt {
    fn write(&self, f: &mut fmt::Formatter, width: usize, right: bool) -> fmt::Result {
        let padding = " ".repeat(width.saturating_sub(self.width));
        if right {
            write!(f, " {}{} ", padding, self.text)
        } else {
            write!(f, " {}{} ", self.text, padding)
        }
    }
}
