pub mod error;
pub mod parse;

use log::info;

use crate::util::bill::Bill;

/// Read and validate the rule file `filename`
///
/// `None` as soon as `errs` holds a fatal error, the bills otherwise.
pub fn read_rules(filename: &str, errs: &mut error::Record) -> Option<Vec<Bill>> {
    let contents = match std::fs::read_to_string(filename) {
        Ok(contents) => contents,
        Err(e) => {
            errs.make("File not found")
                .text(format!("Rule file loaded is '{}'", filename))
                .text(e)
                .hint("create the file or pass another one as argument");
            return None;
        }
    };
    let bills = parse::extract(filename, errs, &contents);
    info!(
        "read {} rule(s) from '{}' with {} warning(s)",
        bills.len(),
        filename,
        errs.count_warnings()
    );
    if errs.is_fatal() {
        None
    } else {
        Some(bills)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn missing_file() {
        let mut errs = error::Record::new();
        assert_eq!(read_rules("no/such/dir/bills.ech", &mut errs), None);
        assert!(errs.is_fatal());
    }

    #[test]
    fn file_on_disk() {
        let path = std::env::temp_dir().join(format!("echeance-{}.ech", std::process::id()));
        std::fs::write(&path, "rent { day 31; lead 2; }\nphone { day 99; }\n").unwrap();
        let mut errs = error::Record::new();
        let bills = read_rules(path.to_str().unwrap(), &mut errs).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(bills.len(), 2);
        assert_eq!(errs.count_warnings(), 1);
        assert_eq!(bills[1].rule.day_of_month, 1);
    }

    #[test]
    fn demo_file() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/demos/reminders.ech");
        let mut errs = error::Record::new();
        let bills = read_rules(path, &mut errs).unwrap();
        assert!(errs.is_empty(), "{}", errs);
        let ids = bills.iter().map(|b| b.rule.id.as_str()).collect::<Vec<_>>();
        assert_eq!(ids, vec!["rent", "phone", "insurance", "gym"]);
        assert!(!bills[3].rule.active);
    }
}
