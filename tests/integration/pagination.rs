use crate::common::{parse, SAMPLE};
use stress_tester::page::{paginate, select, PageSpec, RequestFilter};
use stress_tester::{ActionKind, NullService, RewriteMode, Session};

#[test]
fn pages_run_independently_and_chain() {
    let tree = parse(SAMPLE);
    for mode in RewriteMode::ALL {
        let actions = mode.generate(&tree);
        for count in [1, 2, 3, 7, 50] {
            let pages = paginate(mode, SAMPLE, &actions, count).unwrap();
            let mut previous_end: Option<String> = None;
            for page in pages {
                if let Some(end) = &previous_end {
                    assert_eq!(page.start.content(), end, "{mode} {count}");
                }
                let report = Session::run(page.start, &page.actions, &mut NullService).unwrap();
                previous_end = Some(report.content);
            }
            assert_eq!(previous_end.as_deref(), Some(SAMPLE), "{mode} {count}");
        }
    }
}

#[test]
fn selected_pages_match_full_pagination() {
    let tree = parse(SAMPLE);
    let actions = RewriteMode::InsideOut.generate(&tree);
    let pages = paginate(RewriteMode::InsideOut, SAMPLE, &actions, 4).unwrap();
    for page in &pages {
        let spec: PageSpec = format!("{}/4", page.number).parse().unwrap();
        let selected = select(RewriteMode::InsideOut, SAMPLE, &actions, spec).unwrap();
        assert_eq!(selected.actions, page.actions);
        assert_eq!(selected.start_fingerprint(), page.start_fingerprint());
    }
}

#[test]
fn more_pages_than_actions() {
    let tree = parse("fn f() {}\n");
    let actions = RewriteMode::Basic.generate(&tree);
    let count = actions.len() + 3;
    let pages = paginate(RewriteMode::Basic, tree.source(), &actions, count).unwrap();
    assert_eq!(pages.len(), count);
    assert!(pages[actions.len()..].iter().all(|p| p.actions.is_empty()));
    assert_eq!(pages.last().unwrap().start.content(), tree.source());
}

#[test]
fn filtered_pages_still_rebuild() {
    let tree = parse(SAMPLE);
    let filter = RequestFilter::only([ActionKind::RangeInfo]);
    let actions = RewriteMode::Concurrent.generate(&tree);
    let mut end = None;
    for mut page in paginate(RewriteMode::Concurrent, SAMPLE, &actions, 3).unwrap() {
        filter.apply(&mut page.actions);
        assert!(page
            .actions
            .iter()
            .all(|a| a.is_edit() || a.kind() == ActionKind::RangeInfo));
        end = Some(
            Session::run(page.start, &page.actions, &mut NullService)
                .unwrap()
                .content,
        );
    }
    assert_eq!(end.as_deref(), Some(SAMPLE));
}
