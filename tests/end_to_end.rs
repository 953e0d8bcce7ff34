//! End-to-end search scenarios on realistic pages.

use pagemark::error::Result;
use pagemark::prelude::*;
use pagemark::scope::Eligibility;

const DASHBOARD: &str = r#"<!DOCTYPE html>
<html>
<head><title>Daily dashboard</title></head>
<body>
<nav class="navbar"><a href="/">Home</a><ul><li>Daily report</li></ul></nav>
<main>
<div class="section">
<h2>Admissions</h2>
<p>Patients are scheduled daily.</p>
<table>
<tr><th>Metric</th><th>Value</th></tr>
<tr><td><b>daily</b> totals</td><td>42</td></tr>
</table>
</div>
</main>
<footer><p>Updated daily</p></footer>
</body>
</html>"#;

fn first(doc: &Document, selector: &str) -> NodeId {
    Selector::parse(selector)
        .unwrap()
        .find_first(doc)
        .unwrap()
}

#[test]
fn test_daily_scenario() -> Result<()> {
    let mut doc = Document::parse(DASHBOARD);
    let mut engine = SearchEngine::with_viewport(EngineConfig::default(), RecordingViewport::new());

    let outcome = engine.search(&mut doc, "daily")?;
    assert_eq!(outcome.count, 2);
    assert_eq!(outcome.message, "Found 2 results for \"daily\"");

    // The first highlight sits in the paragraph and is the active one.
    let active = outcome.active().unwrap();
    let paragraph = first(&doc, "p");
    assert_eq!(doc.parent(active), Some(paragraph));
    assert!(doc.has_class(active, "search-highlight-active"));
    assert_eq!(doc.all_with_class("search-highlight-active"), vec![active]);
    assert_eq!(engine.viewport().last(), Some((active, ScrollBlock::Center)));

    // The second sits inside the bold text of the table cell.
    let second = outcome.report.highlights[1];
    assert_eq!(doc.tag(doc.parent(second).unwrap()), Some("b"));

    // Exactly one notification, right after the navigation bar.
    let notification = doc.element_by_id("searchNotification").unwrap();
    assert_eq!(notification, outcome.notification);
    assert_eq!(doc.next_sibling(first(&doc, ".navbar")), Some(notification));
    assert!(doc.text_content(notification).contains("Found 2 results for \"daily\""));

    // Navigation and footer are untouched.
    assert_eq!(doc.text_content(first(&doc, "footer")), "Updated daily");
    assert!(doc.all_with_class("search-highlight").iter().all(|&m| {
        !doc.is_ancestor(first(&doc, "nav"), m) && !doc.is_ancestor(first(&doc, "footer"), m)
    }));
    Ok(())
}

#[test]
fn test_escaping_safety() -> Result<()> {
    let mut doc = Document::parse("<body><p>version a.b*c released</p><p>axbyc</p></body>");
    let mut engine = SearchEngine::default();

    let outcome = engine.search(&mut doc, "a.b*c")?;
    assert_eq!(outcome.count, 1);
    assert_eq!(doc.text_content(outcome.active().unwrap()), "a.b*c");

    let mut doc = Document::parse("<body><p>axbyc</p></body>");
    let result = engine.search(&mut doc, "a.b*c");
    assert!(matches!(result, Err(PagemarkError::NoMatches(_))));
    Ok(())
}

#[test]
fn test_case_insensitive_case_preserving() -> Result<()> {
    let mut doc = Document::parse("<body><p>Clinics in the North region</p></body>");
    let mut engine = SearchEngine::default();
    let outcome = engine.search(&mut doc, "north")?;
    assert_eq!(doc.text_content(outcome.active().unwrap()), "North");
    assert_eq!(outcome.message, "Found 1 result for \"north\"");
    Ok(())
}

#[test]
fn test_rejection_boundary() -> Result<()> {
    let mut doc = Document::parse(DASHBOARD);
    let before = doc.to_html();
    let mut engine = SearchEngine::default();

    let error = engine.search(&mut doc, "d").unwrap_err();
    assert_eq!(error.to_string(), "Please enter at least 2 characters to search");
    assert!(error.is_user_facing());
    assert_eq!(doc.to_html(), before);
    assert!(doc.element_by_id("searchNotification").is_none());

    let outcome = engine.search(&mut doc, "da")?;
    assert!(outcome.count >= 2);
    Ok(())
}

#[test]
fn test_structural_safety() -> Result<()> {
    let markup = "<body><div class=\"card-body\"><div class=\"row\">daily <span>daily</span></div></div><p>daily</p></body>";
    let mut doc = Document::parse(markup);
    let card_body = first(&doc, ".card-body");
    let card_before = doc.inner_html(card_body);

    let mut engine = SearchEngine::default();
    let outcome = engine.search(&mut doc, "daily")?;
    assert_eq!(outcome.count, 1);
    assert_eq!(doc.inner_html(card_body), card_before);
    assert!(
        outcome
            .report
            .skipped
            .iter()
            .any(|s| s.node == card_body && s.reason == Eligibility::Structural)
    );
    Ok(())
}

#[test]
fn test_single_notification_across_searches() -> Result<()> {
    let mut doc = Document::parse(DASHBOARD);
    let mut controller = SearchController::new(SearchEngine::default());

    for query in ["daily", "totals", "patients", "daily"] {
        controller.handle(&mut doc, TriggerEvent::Submit(query.to_string()))?;
        assert_eq!(doc.all_with_class("search-notification").len(), 1, "after {query}");
    }

    let feedback = controller.handle(&mut doc, TriggerEvent::Submit("nothing here".to_string()))?;
    assert_eq!(feedback.message(), Some("No results found for \"nothing here\""));
    assert_eq!(doc.all_with_class("search-notification").len(), 0);
    Ok(())
}

#[test]
fn test_user_text_is_not_markup() -> Result<()> {
    let mut doc = Document::parse("<body><p>compare a&lt;b and b&gt;c</p></body>");
    let mut engine = SearchEngine::default();
    let outcome = engine.search(&mut doc, "a<b")?;
    assert_eq!(outcome.count, 1);

    let html = doc.to_html();
    assert!(html.contains("<strong>a&lt;b</strong>"));
    assert!(html.contains("class=\"search-highlight search-highlight-active\">a&lt;b</mark>"));
    Ok(())
}

#[test]
fn test_named_entities_and_comments_survive_a_search() -> Result<()> {
    let markup = "<body><p>Copyright &copy; 2024 &mdash; daily report&hellip;</p><!-- keep --></body>";
    let mut doc = Document::parse(markup);
    let original = doc.to_html();
    assert_eq!(
        original,
        "<html><head></head><body><p>Copyright \u{a9} 2024 \u{2014} daily report\u{2026}</p><!-- keep --></body></html>"
    );

    let mut engine = SearchEngine::default();
    assert_eq!(engine.search(&mut doc, "daily")?.count, 1);
    engine.clear(&mut doc)?;
    assert_eq!(doc.to_html(), original);

    // Decoded entities are searchable text.
    let outcome = engine.search(&mut doc, "\u{2014} daily")?;
    assert_eq!(outcome.count, 1);
    assert_eq!(doc.text_content(outcome.active().unwrap()), "\u{2014} daily");
    engine.clear(&mut doc)?;
    assert_eq!(doc.to_html(), original);
    Ok(())
}
