use readmegen_core::assess::Assessment;
use readmegen_core::collect::Document;
use readmegen_core::select::{select, SelectedItem};

fn doc(path: &str) -> Document {
    Document {
        source_path: path.to_string(),
        content: format!("content of {path}"),
    }
}

fn rated(path: &str, score: u8, include: bool) -> Assessment {
    Assessment {
        path: path.to_string(),
        score,
        include,
        reason: "because".to_string(),
        summary: "dropped before synthesis".to_string(),
    }
}

fn fixture() -> (Vec<Document>, Vec<Assessment>) {
    let documents = vec![doc("a.py"), doc("b.py"), doc("c.py"), doc("d.py"), doc("e.py")];
    let assessments = vec![
        rated("a.py", 5, true),
        rated("b.py", 3, true),
        rated("c.py", 4, false),
        rated("d.py", 2, true),
        rated("e.py", 0, true),
    ];
    (documents, assessments)
}

#[test]
fn keeps_items_that_are_included_and_reach_the_threshold() {
    let (documents, assessments) = fixture();
    let selection = select(&documents, &assessments, 3);

    assert!(!selection.used_fallback);
    assert_eq!(selection.paths(), vec!["a.py", "b.py"]);

    let first = &selection.items[0];
    assert_eq!(first.content, "content of a.py");
    assert_eq!(first.score, Some(5));
    assert_eq!(first.include, Some(true));
    assert_eq!(first.reason.as_deref(), Some("because"));
}

#[test]
fn raising_the_threshold_never_adds_items() {
    let (documents, assessments) = fixture();
    let mut previous: Option<Vec<String>> = None;
    for threshold in 0..=6u8 {
        let selection = select(&documents, &assessments, threshold);
        let current = if selection.used_fallback {
            Vec::new()
        } else {
            selection.paths()
        };
        for path in &current {
            let a = assessments.iter().find(|a| &a.path == path).unwrap();
            assert!(a.include && a.score >= threshold);
        }
        if let Some(prev) = &previous {
            assert!(current.iter().all(|p| prev.contains(p)), "threshold {threshold} added items");
        }
        previous = Some(current);
    }
}

#[test]
fn falls_back_to_every_document_when_nothing_qualifies() {
    let (documents, assessments) = fixture();
    let selection = select(&documents, &assessments, 6);

    assert!(selection.used_fallback);
    let expected: Vec<SelectedItem> = documents.iter().map(SelectedItem::verbatim).collect();
    assert_eq!(selection.items, expected);
    assert!(selection.items.iter().all(|i| i.score.is_none() && i.reason.is_none()));
    assert!(selection.logs.iter().any(|l| l.contains("using all files instead")));
}

#[test]
fn empty_assessment_path_falls_back_to_document_path() {
    let documents = vec![doc("src/main.rs")];
    let assessments = vec![rated("", 4, true)];
    let selection = select(&documents, &assessments, 3);
    assert_eq!(selection.paths(), vec!["src/main.rs"]);
}

#[test]
fn assessment_path_wins_when_present() {
    let documents = vec![doc("src/main.rs")];
    let assessments = vec![rated("./src/main.rs", 4, true)];
    let selection = select(&documents, &assessments, 3);
    assert_eq!(selection.paths(), vec!["./src/main.rs"]);
    assert_eq!(selection.items[0].content, "content of src/main.rs");
}

#[test]
fn malformed_items_are_logged_and_skipped() {
    let documents = vec![doc("a.py"), doc("b.py"), doc("c.py")];
    // Out-of-range score on b.py, and no assessment at all for c.py.
    let assessments = vec![rated("a.py", 4, true), rated("b.py", 9, true)];

    let selection = select(&documents, &assessments, 3);

    assert!(!selection.used_fallback);
    assert_eq!(selection.paths(), vec!["a.py"]);
    assert_eq!(selection.logs.len(), 2);
    assert!(selection.logs[0].contains("b.py"));
    assert!(selection.logs[1].contains("c.py"));
}

#[test]
fn all_items_failing_triggers_fallback() {
    let documents = vec![doc("a.py"), doc("b.py")];
    let assessments = vec![rated("a.py", 7, true), rated("b.py", 8, true)];

    let selection = select(&documents, &assessments, 3);
    assert!(selection.used_fallback);
    assert_eq!(selection.paths(), vec!["a.py", "b.py"]);
    assert_eq!(selection.logs.len(), 3);
}

#[test]
fn no_documents_yields_empty_selection_without_fallback() {
    let selection = select(&[], &[], 3);
    assert!(selection.items.is_empty());
    assert!(!selection.used_fallback);
}
