use std::sync::{Arc, Once};

use carousel_core::{CarouselSettings, CarouselState};
use carousel_engine::{NewsNormalizer, NormalizerSettings, RawRecord, DEFAULT_CATEGORY, UNKNOWN_AUTHOR};
use chrono::{DateTime, TimeZone, Utc};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

const SITE: &str = "https://contoso.example/sites/news";
const ARTICLE_CT: &str = "0x0101009D1CB255DA76424F860D91F20E6C4118005A";

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(engine_logging::initialize_for_tests);
}

fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 7, 3, 12, 0, 0).unwrap()
}

fn normalizer(settings: NormalizerSettings) -> NewsNormalizer {
    NewsNormalizer::with_clock(settings, Arc::new(fixed_now))
}

fn records(values: Vec<Value>) -> Vec<RawRecord> {
    values.into_iter().filter_map(RawRecord::from_value).collect()
}

fn article(id: i64, title: &str, file: &str) -> Value {
    json!({
        "Id": id,
        "Title": title,
        "FileLeafRef": file,
        "FileRef": format!("/sites/news/SitePages/{file}"),
        "Modified": "2025-06-30T09:15:00Z",
        "CreatedBy": {"Title": "Kim Berger"},
        "ContentType": {"Name": "Websiteseite"},
        "ContentTypeId": ARTICLE_CT,
    })
}

fn page(id: i64, title: &str, file: &str, content_type: &str) -> Value {
    json!({
        "Id": id,
        "Title": title,
        "FileLeafRef": file,
        "ContentType": {"Name": content_type},
    })
}

#[test]
fn mixed_batch_yields_classified_news_only() {
    init_logging();
    let settings =
        NormalizerSettings::for_site(SITE).with_denylist(vec!["Expo Real".to_string()]);
    let mut untitled = article(7, "", "Neue-Kantine.aspx");
    untitled["Title"] = Value::Null;

    let batch = records(vec![
        article(1, "Sommerfest 2025", "Sommerfest-2025.aspx"),
        article(2, "Neu im Team", "Neu-im-Team.aspx"),
        article(3, "Home", "Home.aspx"),
        article(4, "Wir auf der Expo Real", "Expo.aspx"),
        article(5, "Umzug nach Berlin", "Umzug.aspx"),
        article(6, "Jahresbericht", "Jahresbericht.aspx"),
        untitled,
        page(8, "Vorlagen", "Vorlagen.aspx", "Wiki Page"),
        page(9, "Handbuch", "Handbuch.docx", "Dokument"),
        page(10, "Archiv", "Archiv.aspx", "Basic Page"),
    ]);
    assert_eq!(batch.len(), 10);

    let items = normalizer(settings).normalize(batch);
    let ids: Vec<i64> = items.iter().map(|item| item.id).collect();
    assert_eq!(ids, vec![1, 2, 5, 6, 7]);

    let synthesized = items.iter().find(|item| item.id == 7).unwrap();
    assert_eq!(synthesized.title, "Neue-Kantine.aspx");
    assert_eq!(
        synthesized.page_url,
        "https://contoso.example/sites/news/SitePages/Neue-Kantine.aspx"
    );

    let mut state = CarouselState::new(CarouselSettings::default());
    state.load_items(items);
    assert_eq!(state.items().len(), 5);
    assert_eq!(state.current_index(), 0);
}

#[test]
fn display_fields_are_resolved_from_record() {
    init_logging();
    let items = normalizer(NormalizerSettings::for_site(SITE)).normalize(records(vec![article(
        1,
        "Sommerfest 2025",
        "Sommerfest-2025.aspx",
    )]));
    let item = &items[0];
    assert_eq!(item.title, "Sommerfest 2025");
    assert_eq!(item.author, "Kim Berger");
    assert_eq!(item.category, "Websiteseite");
    assert_eq!(
        item.published_date,
        Utc.with_ymd_and_hms(2025, 6, 30, 9, 15, 0).unwrap()
    );
    assert_eq!(item.description, "");
    assert_eq!(
        item.image_url,
        "https://contoso.example/sites/news/_layouts/15/getpreview.ashx?path=%2Fsites%2Fnews%2FSitePages%2FSommerfest-2025.aspx&resolution=6"
    );
}

#[test]
fn localized_article_content_type_is_news() {
    init_logging();
    let items = normalizer(NormalizerSettings::for_site(SITE)).normalize(records(vec![
        page(1, "Betriebsausflug", "Betriebsausflug.aspx", "Artikelseite"),
        page(2, "Vorlagen", "Vorlagen.aspx", "Wiki Page"),
    ]));
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].title, "Betriebsausflug");
    assert_eq!(items[0].category, "Artikelseite");
}

#[test]
fn access_requests_are_excluded_in_every_mode() {
    init_logging();
    let normalizer = normalizer(NormalizerSettings::for_site(SITE));
    let classified = normalizer.normalize(records(vec![
        page(1, "Sommerfest", "Sommerfest.aspx", "News Post"),
        page(2, "Zugriff für Team", "", "Access Request"),
    ]));
    assert_eq!(classified.len(), 1);

    let fallback = normalizer.normalize(records(vec![
        page(1, "Sommerfest", "Sommerfest.aspx", "Wiki Page"),
        page(2, "Zugriff für Team von Alex", "", "Zugriffsanforderung"),
    ]));
    let ids: Vec<i64> = fallback.iter().map(|item| item.id).collect();
    assert_eq!(ids, vec![1]);
}

#[test]
fn access_requests_override_article_content_type() {
    init_logging();
    let mut request = article(2, "Sommerfest", "Sommerfest-Zugriff.aspx");
    request["ContentType"] = json!({"Name": "Access Request"});
    let mut localized = article(3, "Umzug", "Umzug-Zugriff.aspx");
    localized["ContentType"] = json!({"Name": "Artikelseite Zugriffsanforderung"});
    localized["ContentTypeId"] = json!({"StringValue": "0x0101009D1CB255DA76424F860D91F20E6C4118"});

    let items = normalizer(NormalizerSettings::for_site(SITE)).normalize(records(vec![
        article(1, "Neu im Team", "Neu-im-Team.aspx"),
        request,
        localized,
    ]));
    let ids: Vec<i64> = items.iter().map(|item| item.id).collect();
    assert_eq!(ids, vec![1]);
}

#[test]
fn odd_field_types_keep_the_record() {
    init_logging();
    let mut promoted = page(1, "Sommerfest", "Sommerfest.aspx", "News Post");
    promoted["PromotedState"] = json!(2.0);
    let mut odd_description = page(2, "Umzug", "Umzug.aspx", "News Post");
    odd_description["Description"] = json!({"x": 1});
    odd_description["CanvasContent1"] = json!("<p>Wir ziehen um.</p>");

    let batch = records(vec![promoted, odd_description]);
    assert_eq!(batch.len(), 2);

    let items = normalizer(NormalizerSettings::for_site(SITE)).normalize(batch);
    let ids: Vec<i64> = items.iter().map(|item| item.id).collect();
    assert_eq!(ids, vec![1, 2]);
    assert_eq!(items[1].description, "Wir ziehen um.");
}

#[test]
fn home_pages_are_excluded_by_title_or_filename() {
    init_logging();
    let items = normalizer(NormalizerSettings::for_site(SITE)).normalize(records(vec![
        page(1, "Home", "Willkommen.aspx", "News Post"),
        page(2, "Willkommen", "home.aspx", "News Post"),
        page(3, "Homeoffice-Regeln", "Homeoffice.aspx", "News Post"),
    ]));
    let ids: Vec<i64> = items.iter().map(|item| item.id).collect();
    assert_eq!(ids, vec![3]);
}

#[test]
fn descriptions_are_truncated_after_limit() {
    init_logging();
    let exact = "a".repeat(200);
    let long = "b".repeat(201);
    let mut first = page(1, "Exact", "exact.aspx", "News Post");
    first["Description"] = json!(exact);
    let mut second = page(2, "Long", "long.aspx", "News Post");
    second["Description"] = json!(long);

    let items =
        normalizer(NormalizerSettings::for_site(SITE)).normalize(records(vec![first, second]));
    assert_eq!(items[0].description, exact);
    assert_eq!(items[1].description, format!("{}...", "b".repeat(200)));
}

#[test]
fn description_falls_back_to_page_content() {
    init_logging();
    let mut record = page(1, "Sommerfest", "Sommerfest.aspx", "News Post");
    record["CanvasContent1"] = json!(
        "<div><p>Am <b>Freitag</b> feiern wir &amp; grillen.</p><script>track()</script></div>"
    );
    let items = normalizer(NormalizerSettings::for_site(SITE)).normalize(records(vec![record]));
    assert_eq!(items[0].description, "Am Freitag feiern wir & grillen.");
}

#[test]
fn banner_json_string_becomes_absolute_url() {
    init_logging();
    let mut record = page(1, "Sommerfest", "Sommerfest.aspx", "News Post");
    record["BannerImageUrl"] = json!(r#"{"Url":"/sites/x/img.png"}"#);
    let items = normalizer(NormalizerSettings::for_site(SITE)).normalize(records(vec![record]));
    assert_eq!(
        items[0].image_url,
        "https://contoso.example/sites/news/sites/x/img.png"
    );

    let mut own_site = page(2, "Umzug", "Umzug.aspx", "News Post");
    own_site["BannerImageUrl"] = json!({"Url": "/sites/news/SiteAssets/umzug.jpg"});
    let items = normalizer(NormalizerSettings::for_site(SITE)).normalize(records(vec![own_site]));
    assert_eq!(
        items[0].image_url,
        "https://contoso.example/sites/news/SiteAssets/umzug.jpg"
    );
}

#[test]
fn malformed_banner_falls_back_to_content_image() {
    init_logging();
    let mut record = page(1, "Sommerfest", "Sommerfest.aspx", "News Post");
    record["BannerImageUrl"] = json!("{not json}");
    record["CanvasContent1"] = json!(r#"<div><img src="SiteAssets/grill.jpg"></div>"#);
    let items = normalizer(NormalizerSettings::for_site(SITE)).normalize(records(vec![record]));
    assert_eq!(
        items[0].image_url,
        "https://contoso.example/sites/news/SiteAssets/grill.jpg"
    );
}

#[test]
fn unclassified_batch_degrades_to_nameable_pages() {
    init_logging();
    let items = normalizer(NormalizerSettings::for_site(SITE)).normalize(records(vec![
        page(1, "Vorlagen", "Vorlagen.aspx", "Wiki Page"),
        json!({"Id": 2, "FileRef": "/sites/news/SitePages/Ohne-Titel.aspx"}),
        json!({"Id": 3}),
        page(4, "Startseite", "Startseite.aspx", "Wiki Page"),
    ]));
    let ids: Vec<i64> = items.iter().map(|item| item.id).collect();
    assert_eq!(ids, vec![1, 2]);

    let from_ref = &items[1];
    assert_eq!(from_ref.title, "Ohne-Titel.aspx");
    assert_eq!(from_ref.author, UNKNOWN_AUTHOR);
    assert_eq!(from_ref.category, DEFAULT_CATEGORY);
    assert_eq!(from_ref.published_date, fixed_now());
    assert_eq!(
        from_ref.image_url,
        "https://contoso.example/sites/news/_layouts/15/images/sitepagethumbnail.png"
    );
}

#[test]
fn records_without_id_and_empty_input_yield_nothing() {
    init_logging();
    let normalizer = normalizer(NormalizerSettings::for_site(SITE));
    assert!(normalizer.normalize(Vec::new()).is_empty());
    assert!(normalizer
        .normalize(records(vec![json!({"Title": "Ohne Id", "ContentType": {"Name": "News"}})]))
        .is_empty());
}
