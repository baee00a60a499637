//! Integration tests for the editor adapter and the article form

#[cfg(test)]
mod tests {
    use crate::{ArticleForm, EditorAdapter, EditorConfig, EditorError, FormMode, MemorySurface};
    use folio_codec::canonical;
    use folio_domain::traits::ContentApi;
    use folio_domain::{
        Article, ArticlePayload, BlockKind, Category, ListKind, Position, Selection, TextFormat,
    };
    use std::collections::HashMap;

    /// A document saved by an earlier editing session
    const SAVED: &str = r#"{"root":{"children":[
        {"children":[{"detail":0,"format":0,"mode":"normal","style":"","text":"Release notes","type":"text","version":1}],
         "direction":"ltr","format":"","indent":0,"type":"heading","version":1,"tag":"h2"},
        {"children":[
            {"detail":0,"format":0,"mode":"normal","style":"","text":"Plain then ","type":"text","version":1},
            {"detail":0,"format":3,"mode":"normal","style":"","text":"bold italic","type":"text","version":1},
            {"type":"linebreak","version":1},
            {"children":[{"detail":0,"format":0,"mode":"normal","style":"","text":"a link","type":"text","version":1}],
             "direction":"ltr","format":"","indent":0,"type":"link","version":1,"rel":null,"target":null,"title":null,"url":"https://example.com"}
         ],"direction":"ltr","format":"","indent":0,"type":"paragraph","version":1},
        {"children":[
            {"children":[{"text":"first","type":"text","format":0}],"type":"listitem","value":1},
            {"children":[{"text":"second","type":"text","format":8}],"type":"listitem","value":2}
         ],"type":"list","listType":"number","start":1,"tag":"ol"}
    ],"direction":"ltr","format":"","indent":0,"type":"root","version":1}}"#;

    fn editor(initial: Option<&str>) -> EditorAdapter<MemorySurface> {
        EditorAdapter::with_content(MemorySurface::new(), EditorConfig::default(), initial).unwrap()
    }

    fn range(a: (usize, usize), f: (usize, usize)) -> Selection {
        Selection::range(Position::new(a.0, a.1), Position::new(f.0, f.1))
    }

    #[test]
    fn test_saved_session_reserializes_to_equivalent_tree() {
        let editor = editor(Some(SAVED));
        let reserialized = editor.content();

        let original = canonical::decode(SAVED).unwrap();
        let reread = canonical::decode(&reserialized).unwrap();
        assert_eq!(reread, original);
        assert_eq!(reread.block_count(), 4);
        assert_eq!(reread.blocks[3].kind, BlockKind::ListItem(ListKind::Number));
    }

    #[cfg(feature = "dom")]
    #[test]
    fn test_legacy_content_migrates_on_first_emit() {
        let mut editor = editor(Some("<h1>Title</h1><p>Body <i>text</i></p><ul><li>x</li></ul>"));
        let kinds: Vec<_> = editor.document().blocks.iter().map(|b| b.kind).collect();
        assert_eq!(
            kinds,
            vec![
                BlockKind::Heading(1),
                BlockKind::Paragraph,
                BlockKind::ListItem(ListKind::Bullet)
            ]
        );

        editor.select(range((1, 5), (1, 9))).unwrap();
        editor.toggle_italic().unwrap();
        let reread = canonical::decode(&editor.content()).unwrap();
        assert_eq!(&reread, editor.document());
        assert_eq!(reread.blocks[1].children.len(), 1);
    }

    #[test]
    fn test_malformed_markup_initializes() {
        let editor = editor(Some("<p>unclosed <b>bold <<< </div>"));
        assert!(editor.document().plain_text(" ").contains("unclosed"));
        assert!(canonical::decode(&editor.content()).is_ok());
    }

    #[test]
    fn test_plain_text_initializes_as_paragraph() {
        let editor = editor(Some("just some words"));
        assert_eq!(editor.document().plain_text("\n"), "just some words");
    }

    // --- Article form ---

    #[derive(Default)]
    struct MockApi {
        articles: HashMap<String, Article>,
        categories: Vec<Category>,
        fail_categories: bool,
        fail_upload: bool,
        fail_save: bool,
        uploads: Vec<String>,
        saved: Vec<ArticlePayload>,
    }

    impl MockApi {
        fn with_article(article: Article) -> Self {
            let mut api = Self::default();
            api.articles.insert(article.id.clone(), article);
            api
        }

        fn store(&mut self, id: &str, payload: &ArticlePayload) -> Article {
            self.saved.push(payload.clone());
            Article {
                id: id.to_string(),
                title: payload.title.clone(),
                content: payload.content.clone(),
                category_id: payload.category_id.clone(),
                image_url: Some(payload.image_url.clone()),
                created_at: "2024-01-01T00:00:00Z".to_string(),
            }
        }
    }

    impl ContentApi for MockApi {
        type Error = String;

        fn fetch_article(&self, id: &str) -> Result<Article, String> {
            self.articles
                .get(id)
                .cloned()
                .ok_or_else(|| format!("article {} not found", id))
        }

        fn list_categories(&self) -> Result<Vec<Category>, String> {
            if self.fail_categories {
                return Err("connection refused".to_string());
            }
            Ok(self.categories.clone())
        }

        fn upload_image(&mut self, file_name: &str, _bytes: &[u8]) -> Result<String, String> {
            if self.fail_upload {
                return Err("413 payload too large".to_string());
            }
            self.uploads.push(file_name.to_string());
            Ok(format!("https://cdn.example.com/{}", file_name))
        }

        fn create_article(&mut self, payload: &ArticlePayload) -> Result<Article, String> {
            if self.fail_save {
                return Err("500 internal error".to_string());
            }
            Ok(self.store("new-1", payload))
        }

        fn update_article(&mut self, id: &str, payload: &ArticlePayload) -> Result<Article, String> {
            if self.fail_save {
                return Err("500 internal error".to_string());
            }
            Ok(self.store(id, payload))
        }
    }

    fn categories() -> Vec<Category> {
        vec![
            Category {
                id: "tech".to_string(),
                name: "Technology".to_string(),
            },
            Category {
                id: String::new(),
                name: "Broken".to_string(),
            },
        ]
    }

    fn filled_form() -> ArticleForm<MemorySurface> {
        let mut form = ArticleForm::create(MemorySurface::new(), EditorConfig::default()).unwrap();
        form.set_title("A proper title");
        form.select_category("tech");
        form.editor_mut().insert_text("Body text").unwrap();
        form
    }

    #[test]
    fn test_empty_form_collects_every_error() {
        let form = ArticleForm::create(MemorySurface::new(), EditorConfig::default()).unwrap();
        assert_eq!(
            form.validate(),
            vec![
                "Please enter a title with at least 5 characters",
                "Please select a category",
                "Content must be at least 20 characters",
            ]
        );
    }

    #[test]
    fn test_editor_changes_sync_into_content() {
        let form = filled_form();
        assert!(form.validate().is_empty());
        let content = canonical::decode(&form.content()).unwrap();
        assert_eq!(content.plain_text(""), "Body text");
    }

    #[test]
    fn test_short_snapshots_are_not_synced() {
        let config = EditorConfig {
            content_sync_threshold: 100_000,
            ..EditorConfig::default()
        };
        let mut form = ArticleForm::create(MemorySurface::new(), config).unwrap();
        form.editor_mut().insert_text("Body").unwrap();
        assert_eq!(form.content(), "");
    }

    #[test]
    fn test_create_submission() {
        let mut api = MockApi::default();
        let mut form = filled_form();

        let message = form.submit(&mut api).unwrap();
        assert_eq!(message, "Article created successfully!");
        assert_eq!(form.success(), Some("Article created successfully!"));
        assert!(!form.is_submitting());
        assert_eq!(form.mode(), &FormMode::Edit("new-1".to_string()));

        let sent = &api.saved[0];
        assert_eq!(sent.title, "A proper title");
        assert_eq!(sent.category_id, "tech");
        assert_eq!(sent.content, form.editor().content());
        assert_eq!(sent.image_url, "");
    }

    #[test]
    fn test_thumbnail_is_uploaded_first() {
        let mut api = MockApi::default();
        let mut form = filled_form();
        form.attach_thumbnail("cover.png", vec![0x89, 0x50]);

        form.submit(&mut api).unwrap();
        assert_eq!(api.uploads, vec!["cover.png"]);
        assert_eq!(api.saved[0].image_url, "https://cdn.example.com/cover.png");
        assert_eq!(form.image_url(), Some("https://cdn.example.com/cover.png"));
    }

    #[test]
    fn test_upload_failure_aborts_and_keeps_content() {
        let mut api = MockApi {
            fail_upload: true,
            ..MockApi::default()
        };
        let mut form = filled_form();
        form.attach_thumbnail("huge.png", vec![0; 16]);
        let before = form.content();

        let result = form.submit(&mut api);
        assert!(matches!(result, Err(EditorError::Upload(_))));
        assert_eq!(form.error(), Some("Failed to upload new image."));
        assert!(api.saved.is_empty());
        assert_eq!(form.content(), before);
        assert!(!form.is_submitting());

        // Retry succeeds once the upload goes through
        api.fail_upload = false;
        assert!(form.submit(&mut api).is_ok());
    }

    #[test]
    fn test_save_failure_is_recorded() {
        let mut api = MockApi {
            fail_save: true,
            ..MockApi::default()
        };
        let mut form = filled_form();
        assert!(matches!(form.submit(&mut api), Err(EditorError::Api(_))));
        assert_eq!(form.error(), Some("Failed to create article: 500 internal error"));
        assert_eq!(form.editor().document().plain_text(""), "Body text");
    }

    #[test]
    fn test_second_submission_is_rejected_while_pending() {
        let mut api = MockApi::default();
        let mut form = filled_form();

        let pending = form.begin_submit().unwrap();
        assert!(form.is_submitting());
        assert!(matches!(form.begin_submit(), Err(EditorError::SubmissionInFlight)));

        let outcome = pending.send(&mut api);
        form.finish_submit(outcome).unwrap();
        assert!(form.begin_submit().is_ok());
    }

    #[test]
    fn test_invalid_form_is_not_submitted() {
        let mut api = MockApi::default();
        let mut form = ArticleForm::create(MemorySurface::new(), EditorConfig::default()).unwrap();
        match form.submit(&mut api) {
            Err(EditorError::Validation(errors)) => assert_eq!(errors.len(), 3),
            other => panic!("expected validation errors, got {:?}", other.map(|_| ())),
        }
        assert!(!form.is_submitting());
        assert!(api.saved.is_empty());
    }

    #[test]
    fn test_edit_mode_seeds_from_article() {
        let article = Article {
            id: "a-7".to_string(),
            title: "Old title".to_string(),
            content: "<p>Legacy body that is long enough</p>".to_string(),
            category_id: "tech".to_string(),
            image_url: Some("https://cdn.example.com/old.png".to_string()),
            created_at: String::new(),
        };
        let mut api = MockApi::with_article(article);

        let mut form =
            ArticleForm::open(&api, "a-7", MemorySurface::new(), EditorConfig::default()).unwrap();
        assert_eq!(form.mode(), &FormMode::Edit("a-7".to_string()));
        assert_eq!(form.title(), "Old title");
        assert_eq!(form.content(), "<p>Legacy body that is long enough</p>");
        assert_eq!(form.editor().document().plain_text(""), "Legacy body that is long enough");

        // Unedited content is sent back as stored
        assert_eq!(form.submit(&mut api).unwrap(), "Article updated successfully!");
        assert_eq!(api.saved[0].content, "<p>Legacy body that is long enough</p>");
        assert_eq!(api.saved[0].image_url, "https://cdn.example.com/old.png");

        // Any edit switches the field to canonical form
        form.editor_mut().insert_text("New ").unwrap();
        assert!(canonical::decode(&form.content()).is_ok());
    }

    #[test]
    fn test_open_missing_article() {
        let api = MockApi::default();
        let result = ArticleForm::open(&api, "nope", MemorySurface::new(), EditorConfig::default());
        assert!(matches!(result, Err(EditorError::Api(_))));
    }

    #[test]
    fn test_categories_are_loaded_and_filtered() {
        let api = MockApi {
            categories: categories(),
            ..MockApi::default()
        };
        let mut form = filled_form();
        assert!(form.load_categories(&api));
        assert_eq!(form.categories().len(), 1);
        assert_eq!(form.categories()[0].name, "Technology");
    }

    #[test]
    fn test_category_failure_leaves_list_empty() {
        let api = MockApi {
            fail_categories: true,
            ..MockApi::default()
        };
        let mut form = filled_form();
        assert!(!form.load_categories(&api));
        assert!(form.categories().is_empty());
        assert!(form.error().unwrap().starts_with("Failed to fetch categories"));
    }

    #[test]
    fn test_preview() {
        let api = MockApi {
            categories: categories(),
            ..MockApi::default()
        };
        let mut form = filled_form();
        form.load_categories(&api);
        form.editor_mut().enter().unwrap();
        form.editor_mut().insert_text("Second line").unwrap();
        form.attach_thumbnail("cover.jpg", Vec::new());

        let preview = form.preview();
        assert_eq!(preview.title, "A proper title");
        assert_eq!(preview.category_name, "Technology");
        assert_eq!(preview.thumbnail.as_deref(), Some("cover.jpg"));
        assert_eq!(preview.body, "Body text\nSecond line");
    }

    #[test]
    fn test_remove_thumbnail_clears_existing_image() {
        let mut form = filled_form();
        form.attach_thumbnail("cover.jpg", Vec::new());
        form.remove_thumbnail();
        assert!(form.preview().thumbnail.is_none());
        assert!(form.image_url().is_none());
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        #[derive(Debug, Clone)]
        enum Command {
            Type(String),
            Select((usize, usize), (usize, usize)),
            Toggle(usize),
            Enter,
            Backspace,
            LineBreak,
            List(bool),
            Link(bool),
            Undo,
            Redo,
        }

        fn arb_command() -> impl Strategy<Value = Command> {
            let position = || (0usize..4, 0usize..12);
            prop_oneof![
                3 => "[a-zé ]{1,6}".prop_map(Command::Type),
                2 => (position(), position()).prop_map(|(a, f)| Command::Select(a, f)),
                2 => (0usize..4).prop_map(Command::Toggle),
                1 => Just(Command::Enter),
                1 => Just(Command::Backspace),
                1 => Just(Command::LineBreak),
                1 => any::<bool>().prop_map(Command::List),
                1 => any::<bool>().prop_map(Command::Link),
                1 => Just(Command::Undo),
                1 => Just(Command::Redo),
            ]
        }

        fn run(editor: &mut EditorAdapter<MemorySurface>, command: &Command) -> crate::Result<()> {
            match command {
                Command::Type(text) => editor.insert_text(text),
                Command::Select(a, f) => editor.select(range(*a, *f)),
                Command::Toggle(i) => editor.toggle_format(TextFormat::TOGGLES[*i]),
                Command::Enter => editor.enter(),
                Command::Backspace => editor.backspace(),
                Command::LineBreak => editor.line_break(),
                Command::List(bullet) => editor.toggle_list(if *bullet {
                    ListKind::Bullet
                } else {
                    ListKind::Number
                }),
                Command::Link(on) => editor.set_link(on.then_some("https://example.com")),
                Command::Undo => editor.undo().map(|_| ()),
                Command::Redo => editor.redo().map(|_| ()),
            }
        }

        proptest! {
            /// Property: every emitted snapshot decodes back to the editor's document
            #[test]
            fn test_emitted_content_round_trips(commands in prop::collection::vec(arb_command(), 1..25)) {
                let mut editor = editor(None);
                for command in &commands {
                    prop_assert!(run(&mut editor, command).is_ok());
                    let decoded = canonical::decode(&editor.content());
                    prop_assert!(decoded.is_ok());
                    prop_assert_eq!(&decoded.unwrap(), editor.document());
                }
            }

            /// Property: toggling the same flag twice restores the formatting
            #[test]
            fn test_toggle_twice_restores_formatting(
                setup in prop::collection::vec(arb_command(), 0..15),
                anchor in (0usize..4, 0usize..12),
                focus in (0usize..4, 0usize..12),
                flag in 0usize..4,
            ) {
                let mut editor = editor(None);
                for command in &setup {
                    prop_assert!(run(&mut editor, command).is_ok());
                }
                editor.select(range(anchor, focus)).unwrap();
                let before = editor.document().clone();

                editor.toggle_format(TextFormat::TOGGLES[flag]).unwrap();
                editor.toggle_format(TextFormat::TOGGLES[flag]).unwrap();
                prop_assert_eq!(editor.document(), &before);
            }

            /// Property: on stored content whose runs were never merged, toggling
            /// twice restores the text and the format of every character
            #[test]
            fn test_toggle_twice_restores_formatting_of_stored_runs(
                runs in prop::collection::vec(("[a-z ]{1,4}", 0u32..4), 1..6),
                anchor in 0usize..16,
                focus in 0usize..16,
                flag in 0usize..4,
            ) {
                let children: Vec<_> = runs
                    .iter()
                    .map(|(text, format)| serde_json::json!({"type": "text", "text": text, "format": format}))
                    .collect();
                let stored = serde_json::json!({
                    "root": {"children": [{"type": "paragraph", "children": children}]}
                })
                .to_string();

                let mut editor = editor(Some(&stored));
                editor.select(range((0, anchor), (0, focus))).unwrap();
                let before = editor.document().blocks[0].char_formats();

                editor.toggle_format(TextFormat::TOGGLES[flag]).unwrap();
                editor.toggle_format(TextFormat::TOGGLES[flag]).unwrap();
                prop_assert_eq!(editor.document().blocks[0].char_formats(), before);
            }
        }
    }
}
