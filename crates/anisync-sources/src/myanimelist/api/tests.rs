use super::*;
use anisync_models::DateField;

const USER_LIST_JSON: &str = r#"{
  "data": [
    {
      "node": {
        "id": 52991,
        "title": "Sousou no Frieren",
        "alternative_titles": { "synonyms": [], "en": "Frieren: Beyond Journey's End", "ja": "葬送のフリーレン" },
        "num_episodes": 28,
        "start_season": { "year": 2023, "season": "fall" }
      },
      "list_status": {
        "status": "completed",
        "score": 9,
        "num_episodes_watched": 28,
        "is_rewatching": false,
        "start_date": "2023-09-29",
        "finish_date": "2024-03-22"
      }
    },
    {
      "node": {
        "id": 21,
        "title": "One Piece",
        "alternative_titles": { "synonyms": [], "en": "", "ja": "ワンピース" },
        "num_episodes": 0
      },
      "list_status": {
        "status": "watching",
        "score": 0,
        "num_episodes_watched": 1000,
        "start_date": "2019"
      }
    }
  ],
  "paging": { "next": "https://api.myanimelist.net/v2/users/someone/animelist?offset=2" }
}"#;

fn user_list() -> Page<NodeEntry> {
    serde_json::from_str(USER_LIST_JSON).unwrap()
}

#[test]
fn test_user_list_page_parses() {
    let page = user_list();
    assert_eq!(page.data.len(), 2);
    assert!(page.paging.next.is_some());
}

#[test]
fn test_anime_from_list_entry() {
    let page = user_list();
    let entry = &page.data[0];
    let anime = anime_from_node(&entry.node, entry.list_status.as_ref()).unwrap();

    assert_eq!(anime.mal_id, TargetId(52991));
    assert!(!anime.anilist_id.is_known());
    assert_eq!(anime.titles.english, "Frieren: Beyond Journey's End");
    assert_eq!(anime.titles.native, "葬送のフリーレン");
    assert_eq!(anime.titles.romanized, "Sousou no Frieren");
    assert_eq!(anime.status, ListStatus::Completed);
    assert_eq!(anime.score, 9.0);
    assert_eq!(anime.progress, 28);
    assert_eq!(anime.num_episodes, 28);
    assert_eq!(anime.season_year, Some(2023));
    assert_eq!(anime.finished_at, NaiveDate::from_ymd_opt(2024, 3, 22));
}

#[test]
fn test_empty_alternative_title_falls_back_to_main_title() {
    let page = user_list();
    let entry = &page.data[1];
    let anime = anime_from_node(&entry.node, entry.list_status.as_ref()).unwrap();

    assert_eq!(anime.titles.english, "One Piece");
    assert_eq!(anime.status, ListStatus::Current);
    // Partial dates are not parseable
    assert_eq!(anime.started_at, None);
    assert_eq!(anime.finished_at, None);
}

#[test]
fn test_detail_node_uses_my_list_status() {
    let json = r#"{
      "id": 2,
      "title": "Berserk",
      "num_chapters": 0,
      "num_volumes": 0,
      "my_list_status": {
        "status": "reading",
        "score": 10,
        "num_chapters_read": 364,
        "num_volumes_read": 41
      }
    }"#;
    let node: MalNode = serde_json::from_str(json).unwrap();
    let manga = manga_from_node(&node, None).unwrap();

    assert_eq!(manga.status, ListStatus::Current);
    assert_eq!(manga.progress, 364);
    assert_eq!(manga.progress_volumes, 41);
    assert_eq!(manga.chapters, 0);
    // No alternative titles at all
    assert_eq!(manga.titles.native, "Berserk");
}

#[test]
fn test_node_not_on_list_is_unknown_status() {
    let node: MalNode = serde_json::from_str(r#"{ "id": 5114, "title": "Fullmetal Alchemist: Brotherhood" }"#).unwrap();
    let anime = anime_from_node(&node, None).unwrap();
    assert_eq!(anime.status, ListStatus::Unknown);
    assert_eq!(anime.progress, 0);
}

#[test]
fn test_missing_id_is_rejected() {
    let node = MalNode::default();
    assert_eq!(anime_from_node(&node, None).unwrap_err(), ConversionError::MissingId);
    assert_eq!(manga_from_node(&node, None).unwrap_err(), ConversionError::MissingId);
}

const SEARCH_JSON: &str = r#"{
  "data": [
    { "node": { "id": 0, "title": "Broken Candidate" } },
    { "node": { "id": 52991, "title": "Sousou no Frieren", "alternative_titles": { "en": "Frieren: Beyond Journey's End", "ja": "葬送のフリーレン" } } }
  ],
  "paging": {}
}"#;

#[test]
fn test_search_nodes_failing_conversion_are_dropped() {
    let page: Page<NodeEntry> = serde_json::from_str(SEARCH_JSON).unwrap();
    let nodes: Vec<MalNode> = page.data.into_iter().map(|entry| entry.node).collect();

    let anime: Vec<Anime> = records_from_nodes(&nodes, anime_from_node);
    assert_eq!(anime.len(), 1);
    assert_eq!(anime[0].mal_id, TargetId(52991));

    let manga: Vec<Manga> = records_from_nodes(&nodes, manga_from_node);
    assert_eq!(manga.len(), 1);
    assert_eq!(manga[0].titles.english, "Frieren: Beyond Journey's End");
}

#[test]
fn test_list_entries_failing_conversion_are_dropped() {
    let mut page = user_list();
    page.data[1].node.id = 0;
    let anime: Vec<Anime> = records_from_entries(&page.data, anime_from_node);
    assert_eq!(anime.len(), 1);
    assert_eq!(anime[0].status, ListStatus::Completed);
}

#[test]
fn test_anime_update_form() {
    let update = ListUpdate {
        kind: MediaKind::Anime,
        status: "completed",
        score: 8.6,
        progress: 28,
        progress_secondary: None,
        start_date: DateField::Set(NaiveDate::from_ymd_opt(2023, 9, 29).unwrap()),
        finish_date: DateField::Unset,
    };
    let form = update_form(&update);

    assert_eq!(
        form,
        vec![
            ("status", "completed".to_string()),
            ("score", "9".to_string()),
            ("num_watched_episodes", "28".to_string()),
            ("start_date", "2023-09-29".to_string()),
            ("finish_date", String::new()),
        ]
    );
}

#[test]
fn test_manga_update_form_includes_volumes() {
    let update = ListUpdate {
        kind: MediaKind::Manga,
        status: "reading",
        score: 0.0,
        progress: 120,
        progress_secondary: Some(12),
        start_date: DateField::Unset,
        finish_date: DateField::Unset,
    };
    let form = update_form(&update);

    assert!(form.contains(&("num_chapters_read", "120".to_string())));
    assert!(form.contains(&("num_volumes_read", "12".to_string())));
    assert!(!form.iter().any(|(key, _)| *key == "num_watched_episodes"));
}
