use articler_core::{search_link, ArticlePlan, JobRequest};
use pretty_assertions::assert_eq;

fn request(keywords: &[&str]) -> JobRequest {
    JobRequest {
        main_keyword: "主词".to_string(),
        secondary_keywords: keywords.iter().map(|k| k.to_string()).collect(),
        main_link: "https://main.example".to_string(),
        link_pool: vec!["L1".into(), "L2".into(), "L3".into()],
        title_pool: vec!["T1".into(), "T2".into(), "T3".into()],
    }
}

#[test]
fn title_pairs_keyword_with_its_successor() {
    let req = request(&["A", "B", "C"]);

    let first = ArticlePlan::new(0, &req, 0, 3);
    assert_eq!(first.no, 1);
    assert_eq!((first.sub1.as_str(), first.sub2.as_str()), ("A", "B"));
    assert_eq!(first.title, "主词-【网址：https://main.example】-A-B");

    let last = ArticlePlan::new(2, &req, 2, 3);
    assert_eq!(last.no, 3);
    assert_eq!((last.sub1.as_str(), last.sub2.as_str()), ("C", "A"));
}

#[test]
fn single_keyword_is_used_twice() {
    let plan = ArticlePlan::new(0, &request(&["Solo"]), 0, 3);
    assert_eq!(plan.sub1, "Solo");
    assert_eq!(plan.sub2, "Solo");
}

#[test]
fn bing_link_encodes_title() {
    let plan = ArticlePlan::new(0, &request(&["a b", "c&d"]), 0, 3);
    assert_eq!(plan.bing_link, search_link(&plan.title));
    assert!(plan.bing_link.starts_with("https://www.bing.com/search?q="));
    assert!(plan.bing_link.contains("a+b-c%26d"));
    assert!(!plan.bing_link.contains(' '));
}

#[test]
fn search_link_uses_plus_for_spaces() {
    assert_eq!(
        search_link("rust job queue"),
        "https://www.bing.com/search?q=rust+job+queue"
    );
}

#[test]
fn html_wrapping_for_success_and_failure() {
    let plan = ArticlePlan::new(0, &request(&["A", "B"]), 0, 3);

    assert_eq!(
        plan.success_html("正文"),
        r#"<a href="https://main.example" target="_blank">主词 -【网址：https://main.example】- 正文</a>"#
    );
    let failure = plan.failure_html(&"http status 500");
    assert!(failure.contains("AI生成失败：http status 500"));
    assert!(failure.starts_with(r#"<a href="https://main.example""#));
}

#[test]
fn plan_is_deterministic_and_converts_into_article() {
    let req = request(&["A", "B"]);
    let a = ArticlePlan::new(1, &req, 1, 3);
    let b = ArticlePlan::new(1, &req, 1, 3);
    assert_eq!(a, b);

    let article = a.into_article("html".to_string());
    assert_eq!(article.no, 2);
    assert_eq!(article.ai_html, "html");
    assert_eq!(article.main_link, "https://main.example");
    assert_eq!(article.embedded.len(), 4);
    assert_eq!(article.embedded[0].title, "T2");
}
