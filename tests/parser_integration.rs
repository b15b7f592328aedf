use nfse_faturamento::{DomPage, Money, PageSummary, Period, RawPage, extract_tax_id};

fn load_fixture(name: &str) -> DomPage {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name);
    let html = std::fs::read_to_string(path).expect("read fixture");
    DomPage::parse(&RawPage::ok(html))
}

fn money(cents: i64) -> Money {
    Money::new(cents, 2)
}

#[test]
fn first_page_sums_issued_rows_of_the_year() {
    let page = load_fixture("emitidas_p1.html");
    let summary = page.summarize(&Period::year(2025));
    assert_eq!(summary.amount, money(30_000));
    assert_eq!(summary.count, 3);
    assert!(summary.keep_scanning);
    assert!(page.has_next_page());
}

#[test]
fn first_page_with_month_filter() {
    let page = load_fixture("emitidas_p1.html");
    let summary = page.summarize(&Period::month(2025, 11));
    assert_eq!(summary.amount, money(20_000));
    assert_eq!(summary.count, 2);
    assert!(summary.keep_scanning);
}

#[test]
fn second_page_stops_at_previous_year() {
    let page = load_fixture("emitidas_p2.html");
    let summary = page.summarize(&Period::year(2025));
    assert_eq!(summary.amount, money(5_000));
    assert_eq!(summary.count, 1);
    assert!(!summary.keep_scanning);
}

#[test]
fn last_page_skips_unparseable_amount() {
    let page = load_fixture("emitidas_ultima.html");
    let summary = page.summarize(&Period::month(2025, 3));
    assert_eq!(summary.amount, money(123_456));
    assert_eq!(summary.count, 1);
    assert!(!page.has_next_page());
}

#[test]
fn empty_listing_is_exhausted() {
    let page = load_fixture("emitidas_vazia.html");
    assert_eq!(page.summarize(&Period::year(2025)), PageSummary::EXHAUSTED);
}

#[test]
fn login_page_yields_formatted_cnpj() {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/login.html");
    let html = std::fs::read_to_string(path).expect("read fixture");
    assert_eq!(extract_tax_id(&html).as_deref(), Some("12.345.678/0001-95"));
}
