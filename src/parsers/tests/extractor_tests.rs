use crate::parsers::html::{extract, inner_text};
use crate::parsers::{PageSnapshot, Parser};
use crate::results::Tag;
use scraper::{Html, Selector};
use url::Url;

fn snapshot(url: &str, html: &str) -> PageSnapshot {
    PageSnapshot::new(Url::parse(url).unwrap(), html)
}

#[cfg(test)]
mod unit_tests {
    use super::*;

    fn text_of(html: &str, css: &str) -> String {
        let doc = Html::parse_fragment(html);
        let selector = Selector::parse(css).unwrap();
        let element = doc.select(&selector).next().unwrap();
        inner_text(&element)
    }

    #[test]
    fn test_inner_text_collapses_whitespace() {
        assert_eq!(text_of("<p>  Hello\n\n   world  </p>", "p"), "Hello world");
        assert_eq!(text_of("<p>Hello<b>world</b></p>", "p"), "Helloworld");
        assert_eq!(text_of("<p>line one<br>line two</p>", "p"), "line one line two");
        assert_eq!(
            text_of(r#"<a href="/x"><div>One</div><div>Two</div></a>"#, "a"),
            "One Two"
        );
        assert_eq!(
            text_of("<h2><span>Top</span><ul><li>a</li><li>b</li></ul></h2>", "h2"),
            "Top a b"
        );
    }

    #[test]
    fn test_card_anchor_blocks_stay_separate_words() {
        let html = r#"<body>
            <a href="/card"><div><h3>Title</h3><p>Summary</p></div><span>More</span></a>
        </body>"#;
        let result = extract(&snapshot("http://root.test/", html)).unwrap();

        let anchor = result
            .records
            .iter()
            .find(|record| record.tag == Tag::A)
            .unwrap();
        assert_eq!(anchor.content, "Title Summary More");
    }

    #[test]
    fn test_inner_text_skips_scripts_and_styles() {
        let html = "<p>Visible<script>var hidden = 1;</script><style>p{}</style> text</p>";
        assert_eq!(text_of(html, "p"), "Visible text");
    }

    #[test]
    fn test_records_follow_selector_group_order() {
        let html = r#"<html><body>
            <h1>Title</h1>
            <p>First</p>
            <a href="/one">One</a>
            <h2>Sub</h2>
            <p>Second</p>
        </body></html>"#;
        let result = extract(&snapshot("http://root.test/", html)).unwrap();

        let tags: Vec<Tag> = result.records.iter().map(|r| r.tag).collect();
        assert_eq!(tags, vec![Tag::P, Tag::P, Tag::H1, Tag::H2, Tag::A]);
        assert_eq!(result.records[0].content, "First");
        assert_eq!(result.records[1].content, "Second");
    }

    #[test]
    fn test_empty_elements_are_dropped() {
        let html = r#"<body>
            <p>   </p>
            <p>Kept</p>
            <h3></h3>
            <a name="anchor-without-href"></a>
            <a href="/icon"><img src="/icon.png"></a>
        </body>"#;
        let result = extract(&snapshot("http://root.test/", html)).unwrap();

        assert_eq!(result.records.len(), 2);
        assert_eq!(result.records[0].content, "Kept");
        assert_eq!(result.records[1].tag, Tag::A);
        assert_eq!(result.records[1].content, "");
        assert_eq!(result.records[1].href.as_deref(), Some("http://root.test/icon"));
    }

    #[test]
    fn test_anchor_text_without_href_is_kept() {
        let html = r#"<body><a>Just text</a></body>"#;
        let result = extract(&snapshot("http://root.test/", html)).unwrap();

        assert_eq!(result.records.len(), 1);
        assert_eq!(result.records[0].href, None);
        assert!(result.links.is_empty());
    }

    #[test]
    fn test_hrefs_are_resolved_against_the_page() {
        let html = r#"<body>
            <a href="/x">Root relative</a>
            <a href="y">Path relative</a>
            <a href="https://other.test/z">Absolute</a>
            <a href="mailto:me@root.test">Mail</a>
        </body>"#;
        let result = extract(&snapshot("http://root.test/dir/page", html)).unwrap();

        assert_eq!(
            result.links,
            vec![
                "http://root.test/x",
                "http://root.test/dir/y",
                "https://other.test/z",
                "mailto:me@root.test",
            ]
        );
    }

    #[test]
    fn test_base_element_overrides_page_url() {
        let html = r#"<html><head><base href="http://cdn.test/assets/"></head><body>
            <a href="doc">Doc</a>
            <img src="pic.png">
        </body></html>"#;
        let result = extract(&snapshot("http://root.test/", html)).unwrap();

        assert_eq!(result.links, vec!["http://cdn.test/assets/doc"]);
        assert_eq!(result.images, vec!["http://cdn.test/assets/pic.png"]);
    }

    #[test]
    fn test_duplicate_links_are_kept() {
        let html = r#"<body><a href="/">Home</a><p>x</p><a href="/">Home</a></body>"#;
        let result = extract(&snapshot("http://root.test/", html)).unwrap();

        assert_eq!(result.links, vec!["http://root.test/", "http://root.test/"]);
    }

    #[test]
    fn test_images_are_trimmed_and_empty_sources_dropped() {
        let html = r#"<body>
            <img src="  /a.png  ">
            <img src="">
            <img alt="no source">
            <img src="http://img.test/b.jpg">
        </body>"#;
        let result = extract(&snapshot("http://root.test/", html)).unwrap();

        assert_eq!(
            result.images,
            vec!["http://root.test/a.png", "http://img.test/b.jpg"]
        );
    }

    #[test]
    fn test_parser_delegates_to_html_extractor() {
        let html = "<html><body><p>Hello, world!</p><a href=\"https://example.com\">Link</a></body></html>";
        let result = Parser::extract(&snapshot("https://example.org/page", html)).unwrap();
        assert_eq!(result.records.len(), 2);
        assert_eq!(result.links, vec!["https://example.com/"]);
    }
}
