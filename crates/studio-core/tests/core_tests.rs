use std::fs;
use tempfile::TempDir;

use studio_core::config::Config;
use studio_core::error::Error;
use studio_core::library::{load_materials, load_records, load_topic, load_topics, Library};
use studio_core::types::{
    CompareCard, Credibility, Dimension, Dynasty, HotTopic, Material, Platform, SourceType,
};

const MATERIALS_JSON: &str = r#"[
  {
    "id": "m1",
    "title": "王安石变法与青苗法",
    "sourceType": "研究",
    "credibility": "高",
    "dynasties": ["宋元"],
    "people": ["王安石"],
    "events": ["青苗法"],
    "dimensions": ["财政", "制度"],
    "citation": { "work": "宋史", "locator": "食货志" },
    "createdAt": "2024-01-01T00:00:00Z"
  }
]"#;

#[test]
fn load_single_material_file() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("materials.json");
    fs::write(&path, MATERIALS_JSON).unwrap();

    let materials = load_materials(&path).expect("load");

    assert_eq!(materials.len(), 1);
    let m = &materials[0];
    assert_eq!(m.source_type, SourceType::Research);
    assert_eq!(m.credibility, Credibility::High);
    assert_eq!(m.dynasties, vec![Dynasty::SongYuan]);
    assert_eq!(m.dimensions, vec![Dimension::Fiscal, Dimension::Institutions]);
    assert_eq!(m.citation.as_ref().and_then(|c| c.locator.as_deref()), Some("食货志"));
    assert!(m.excerpt.is_none(), "absent optional fields stay empty");
}

#[test]
fn load_directory_concatenates_in_path_order() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path();
    let card = |id: &str| {
        format!(
            r#"[{{"id":"{id}","topicTitle":"t","eventTitle":"e","createdAt":"2024-01-01T00:00:00Z"}}]"#
        )
    };
    fs::write(dir.join("b.json"), card("c2")).unwrap();
    fs::write(dir.join("a.json"), card("c1")).unwrap();
    fs::write(dir.join("notes.txt"), "ignored").unwrap();

    let cards: Vec<CompareCard> = load_records(dir).expect("load dir");

    let ids: Vec<&str> = cards.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec!["c1", "c2"]);
    assert!(cards[0].key_people.is_empty());
}

#[test]
fn missing_path_reads_as_empty() {
    let tmp = TempDir::new().unwrap();
    let lib = Library::load(&tmp.path().join("nope.json"), &tmp.path().join("nope-dir")).expect("load");
    assert!(lib.materials.is_empty());
    assert!(lib.cards.is_empty());
}

#[test]
fn malformed_json_is_a_parse_error() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("bad.json");
    fs::write(&path, "[{\"id\": ").unwrap();

    let err = load_materials(&path).unwrap_err();
    assert!(matches!(err, Error::Parse { .. }), "got {err:?}");
}

#[test]
fn topic_platform_inferred_from_url() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("topic.json");
    fs::write(
        &path,
        r#"{"title":"限购政策争议","url":"https://weibo.com/123","keywords":["限购"]}"#,
    )
    .unwrap();

    let topic = load_topic(&path).expect("topic");
    assert_eq!(topic.platform(), Some(Platform::Weibo));
    assert_eq!(topic.keywords, vec!["限购".to_string()]);

    let explicit = HotTopic { platform: Some(Platform::Douyin), ..topic };
    assert_eq!(explicit.platform(), Some(Platform::Douyin));
}

#[test]
fn load_topics_from_file_and_directory() {
    let tmp = TempDir::new().unwrap();
    let file = tmp.path().join("topics.json");
    fs::write(
        &file,
        r#"[
  {"id":"t1","title":"限购政策争议","url":"https://www.douyin.com/video/1","createdAt":"2024-03-01T08:00:00Z"},
  {"title":"芯片出口管制","platform":"bilibili","summary":"技术封锁","keywords":["芯片","出口"]}
]"#,
    )
    .unwrap();

    let topics = load_topics(&file).expect("topics");
    assert_eq!(topics.len(), 2);
    assert_eq!(topics[0].id.as_deref(), Some("t1"));
    assert!(topics[0].created_at.is_some());
    assert_eq!(topics[0].platform, None);
    assert_eq!(topics[0].platform(), Some(Platform::Douyin));
    assert_eq!(topics[1].platform(), Some(Platform::Bilibili));
    assert_eq!(topics[1].summary.as_deref(), Some("技术封锁"));
    assert_eq!(topics[1].keywords.len(), 2);

    let dir = tmp.path().join("topics");
    fs::create_dir(&dir).unwrap();
    fs::write(dir.join("b.json"), r#"[{"title":"盐价上涨"}]"#).unwrap();
    fs::write(dir.join("a.json"), r#"[{"title":"漕运改道"}]"#).unwrap();
    let titles: Vec<String> = load_topics(&dir).expect("dir").into_iter().map(|t| t.title).collect();
    assert_eq!(titles, vec!["漕运改道", "盐价上涨"]);
}

#[test]
fn config_env_name_prefers_explicit() {
    assert_eq!(Config::env_name(Some("test")), "test");
    assert!(!Config::env_name(None).is_empty());
}

#[test]
fn platform_from_url_hosts() {
    assert_eq!(Platform::from_url("https://mp.weixin.qq.com/s/abc"), Some(Platform::Wechat));
    assert_eq!(Platform::from_url("http://xhslink.com/x"), Some(Platform::Xiaohongshu));
    assert_eq!(Platform::from_url("https://www.bilibili.com/video/1"), Some(Platform::Bilibili));
    assert_eq!(Platform::from_url("https://example.org"), None);
    assert_eq!(Platform::from_url("not a url"), None);
}

#[test]
fn labels_parse_and_display() {
    assert_eq!("宋元".parse::<Dynasty>().unwrap(), Dynasty::SongYuan);
    assert_eq!(Dimension::PublicOpinion.to_string(), "舆论");
    assert!(matches!("元朝".parse::<Dynasty>(), Err(Error::UnknownLabel { .. })));
    assert_eq!(Dynasty::ALL.len(), 6);
    assert_eq!(Dimension::ALL.len(), 8);
}

#[test]
fn material_serializes_with_camel_case_and_labels() {
    let mut m = Material::new("m1", "盐铁论");
    m.credibility = Credibility::Low;
    let json = serde_json::to_value(&m).unwrap();
    assert_eq!(json["sourceType"], "史料");
    assert_eq!(json["credibility"], "低");
    assert!(json.get("createdAt").is_some());
    assert!(json.get("excerpt").is_none());
}

#[test]
fn config_defaults_without_files() {
    let tmp = TempDir::new().unwrap();
    let config = Config::load_in(tmp.path(), "test").expect("config");
    let settings = config.settings().expect("settings");
    assert_eq!(settings.matching.material_limit, 10);
    assert_eq!(settings.matching.card_limit, 5);
    assert_eq!(config.materials_path().unwrap(), tmp.path().join("data/materials.json"));
}

#[test]
fn config_env_overlay_overrides_base() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join("config.toml"),
        "[data]\nmaterials_path = \"lib/materials\"\n\n[match]\nmaterial_limit = 12\n",
    )
    .unwrap();
    fs::write(tmp.path().join("config.test.toml"), "[match]\ncard_limit = 3\n").unwrap();

    let config = Config::load_in(tmp.path(), "test").expect("config");
    let settings = config.settings().unwrap();
    assert_eq!(settings.matching.material_limit, 12);
    assert_eq!(settings.matching.card_limit, 3);
    assert_eq!(config.materials_path().unwrap(), tmp.path().join("lib/materials"));
    assert_eq!(config.get::<usize>("match.card_limit").unwrap(), 3);
}

#[test]
fn config_rejects_zero_limit() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("config.toml"), "[match]\ncard_limit = 0\n").unwrap();
    assert!(Config::load_in(tmp.path(), "test").is_err());
}
