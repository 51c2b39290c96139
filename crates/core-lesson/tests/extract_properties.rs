//! Property-based tests for section extraction.

use chrono::NaiveDate;
use core_lesson::{TargetHeading, extract};
use proptest::prelude::*;

fn target() -> TargetHeading {
    TargetHeading::for_date(NaiveDate::from_ymd_opt(2024, 3, 18).unwrap())
}

// Body lines: words, blank and whitespace-only lines, sub-headings, but never a
// top-level `### ` heading.
fn body_line() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-z ]{1,12}".prop_map(|s| format!("x{s}")),
        Just(String::new()),
        Just("   ".to_string()),
        "[a-z]{1,6}".prop_map(|s| format!("#### {s}")),
    ]
}

fn collapse_blanks(lines: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    let mut last_blank = false;
    for line in lines {
        if line.trim().is_empty() {
            if !last_blank {
                out.push(String::new());
            }
            last_blank = true;
        } else {
            out.push(line.clone());
            last_blank = false;
        }
    }
    out
}

proptest! {
    // A heading absent from the document is never found.
    #[test]
    fn absent_heading_not_found(body in proptest::collection::vec(body_line(), 0..30)) {
        prop_assert!(extract(&body, &target()).is_none());
    }

    // Exactly the lines between the heading and the next `### ` line, blank runs collapsed.
    #[test]
    fn section_matches_reference(
        before in proptest::collection::vec(body_line(), 0..10),
        body in proptest::collection::vec(body_line(), 0..30),
        after in proptest::collection::vec(body_line(), 0..10),
        terminated in any::<bool>(),
    ) {
        let t = target();
        let mut doc = before.clone();
        doc.push(t.to_string());
        doc.extend(body.iter().cloned());
        if terminated {
            doc.push("### Tuesday 2024-03-19".to_string());
            doc.extend(after.iter().cloned());
        }

        let section = extract(&doc, &t).expect("heading present");
        let mut expected = vec![t.to_string()];
        expected.extend(collapse_blanks(&body));
        prop_assert_eq!(section.lines(), expected.as_slice());
    }

    // No section ever holds two consecutive blank lines.
    #[test]
    fn never_two_consecutive_blanks(body in proptest::collection::vec(body_line(), 0..40)) {
        let t = target();
        let mut doc = vec![t.to_string()];
        doc.extend(body);
        let section = extract(&doc, &t).expect("heading present");
        for pair in section.lines().windows(2) {
            prop_assert!(!(pair[0].is_empty() && pair[1].is_empty()));
        }
    }

    // Pure function of its inputs.
    #[test]
    fn idempotent(body in proptest::collection::vec(body_line(), 0..30)) {
        let t = target();
        let mut doc = vec!["preamble".to_string(), t.to_string()];
        doc.extend(body);
        prop_assert_eq!(extract(&doc, &t), extract(&doc, &t));
    }
}
