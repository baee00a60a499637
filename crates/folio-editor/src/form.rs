//! Article form: title, category, thumbnail, and the editor body
//!
//! The form owns an [`EditorAdapter`] and listens to its change events. A
//! snapshot is copied into the form's content field only once it reaches
//! the configured sync threshold, so the field holds the last long-enough
//! canonical string the editor produced.
//!
//! Submission runs in three steps so a caller can hand the network part to
//! whatever transport it uses:
//!
//! ```text
//! begin_submit() ──► PendingSubmission::send(api) ──► finish_submit(outcome)
//! ```
//!
//! While a submission is pending, `begin_submit` refuses to start another.

use crate::adapter::EditorAdapter;
use crate::config::EditorConfig;
use crate::error::{EditorError, Result};
use folio_domain::traits::{ContentApi, EditingSurface};
use folio_domain::{Article, ArticlePayload, Category};
use folio_extractor::TextExtractor;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use tracing::{info, warn};

/// Minimum title length, in characters
pub const MIN_TITLE_LENGTH: usize = 5;

/// Minimum content length, in characters
pub const MIN_CONTENT_LENGTH: usize = 20;

const UPLOAD_FAILED: &str = "Failed to upload new image.";

/// Whether the form creates a new article or edits an existing one
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    /// New article
    Create,
    /// Existing article with this identifier
    Edit(String),
}

/// A newly chosen thumbnail image, not yet uploaded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Thumbnail {
    /// File name sent with the upload
    pub file_name: String,
    /// Image bytes
    pub bytes: Vec<u8>,
}

/// What the preview dialog shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preview {
    /// Title as typed
    pub title: String,
    /// Name of the selected category, empty if none
    pub category_name: String,
    /// Existing image URL, or the file name of a new thumbnail
    pub thumbnail: Option<String>,
    /// Multi-line plain text of the content
    pub body: String,
}

/// A validated submission waiting to be sent
#[derive(Debug, Clone)]
pub struct PendingSubmission {
    mode: FormMode,
    payload: ArticlePayload,
    thumbnail: Option<Thumbnail>,
}

impl PendingSubmission {
    /// The payload as it will be sent, before any thumbnail upload
    pub fn payload(&self) -> &ArticlePayload {
        &self.payload
    }

    /// Upload the thumbnail (if any), then create or update the article
    pub fn send<A>(&self, api: &mut A) -> Result<Article>
    where
        A: ContentApi,
        A::Error: fmt::Display,
    {
        let mut payload = self.payload.clone();
        if let Some(thumbnail) = &self.thumbnail {
            payload.image_url = api
                .upload_image(&thumbnail.file_name, &thumbnail.bytes)
                .map_err(|e| EditorError::Upload(e.to_string()))?;
            info!("Uploaded thumbnail {}", thumbnail.file_name);
        }

        match &self.mode {
            FormMode::Create => api.create_article(&payload),
            FormMode::Edit(id) => api.update_article(id, &payload),
        }
        .map_err(|e| EditorError::Api(e.to_string()))
    }
}

/// Create/edit form for one article
pub struct ArticleForm<S: EditingSurface> {
    mode: FormMode,
    title: String,
    category_id: String,
    image_url: Option<String>,
    thumbnail: Option<Thumbnail>,
    categories: Vec<Category>,
    content: Rc<RefCell<String>>,
    editor: EditorAdapter<S>,
    extractor: TextExtractor,
    submitting: bool,
    error: Option<String>,
    success: Option<String>,
}

impl<S> ArticleForm<S>
where
    S: EditingSurface,
    S::Error: fmt::Display,
{
    /// Empty form for a new article
    pub fn create(surface: S, config: EditorConfig) -> Result<Self> {
        Self::build(FormMode::Create, surface, config, None)
    }

    /// Form seeded from an existing article
    pub fn edit(surface: S, config: EditorConfig, article: &Article) -> Result<Self> {
        let mut form = Self::build(
            FormMode::Edit(article.id.clone()),
            surface,
            config,
            Some(article.content.as_str()),
        )?;
        form.title = article.title.clone();
        form.category_id = article.category_id.clone();
        form.image_url = article.image_url.clone().filter(|url| !url.is_empty());
        Ok(form)
    }

    /// Fetch an article and open it for editing
    pub fn open<A>(api: &A, id: &str, surface: S, config: EditorConfig) -> Result<Self>
    where
        A: ContentApi,
        A::Error: fmt::Display,
    {
        let article = api.fetch_article(id).map_err(|e| {
            warn!("Failed to fetch article {}: {}", id, e);
            EditorError::Api(format!("Failed to load article data: {}", e))
        })?;
        Self::edit(surface, config, &article)
    }

    fn build(mode: FormMode, surface: S, config: EditorConfig, initial: Option<&str>) -> Result<Self> {
        let threshold = config.content_sync_threshold;
        let mut editor = EditorAdapter::with_content(surface, config, initial)?;

        let content = Rc::new(RefCell::new(initial.unwrap_or_default().to_string()));
        let field = Rc::clone(&content);
        editor.subscribe(move |event| {
            if event.content.chars().count() >= threshold {
                *field.borrow_mut() = event.content.clone();
            }
        });

        Ok(Self {
            mode,
            title: String::new(),
            category_id: String::new(),
            image_url: None,
            thumbnail: None,
            categories: Vec::new(),
            content,
            editor,
            extractor: TextExtractor::default(),
            submitting: false,
            error: None,
            success: None,
        })
    }

    /// Create or edit
    pub fn mode(&self) -> &FormMode {
        &self.mode
    }

    /// The editor driving the content field
    pub fn editor(&self) -> &EditorAdapter<S> {
        &self.editor
    }

    /// Mutable access to the editor for formatting commands
    pub fn editor_mut(&mut self) -> &mut EditorAdapter<S> {
        &mut self.editor
    }

    /// Current title
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Set the title
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    /// Selected category identifier, empty if none
    pub fn category_id(&self) -> &str {
        &self.category_id
    }

    /// Select a category
    pub fn select_category(&mut self, id: impl Into<String>) {
        self.category_id = id.into();
    }

    /// Content field value (the last synced editor snapshot)
    pub fn content(&self) -> String {
        self.content.borrow().clone()
    }

    /// Categories available for selection
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Existing thumbnail URL
    pub fn image_url(&self) -> Option<&str> {
        self.image_url.as_deref()
    }

    /// Choose a new thumbnail; it is uploaded on submit
    pub fn attach_thumbnail(&mut self, file_name: impl Into<String>, bytes: Vec<u8>) {
        self.thumbnail = Some(Thumbnail {
            file_name: file_name.into(),
            bytes,
        });
    }

    /// Drop both the new thumbnail and the existing image
    pub fn remove_thumbnail(&mut self) {
        self.thumbnail = None;
        self.image_url = None;
    }

    /// Whether a submission is pending
    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Last error shown to the user
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Last success message
    pub fn success(&self) -> Option<&str> {
        self.success.as_deref()
    }

    /// Load the category list
    ///
    /// On failure the list is left empty and the message is recorded; the
    /// form stays usable.
    pub fn load_categories<A>(&mut self, api: &A) -> bool
    where
        A: ContentApi,
        A::Error: fmt::Display,
    {
        match api.list_categories() {
            Ok(categories) => {
                self.categories = categories.into_iter().filter(|c| !c.id.is_empty()).collect();
                true
            }
            Err(e) => {
                warn!("Failed to fetch categories: {}", e);
                self.categories.clear();
                self.error = Some(format!("Failed to fetch categories: {}", e));
                false
            }
        }
    }

    /// Every validation failure, in field order
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if self.title.chars().count() < MIN_TITLE_LENGTH {
            errors.push("Please enter a title with at least 5 characters".to_string());
        }
        if self.category_id.is_empty() {
            errors.push("Please select a category".to_string());
        }
        if self.content.borrow().chars().count() < MIN_CONTENT_LENGTH {
            errors.push("Content must be at least 20 characters".to_string());
        }
        errors
    }

    /// Data for the preview dialog
    pub fn preview(&self) -> Preview {
        let category_name = self
            .categories
            .iter()
            .find(|c| c.id == self.category_id)
            .map(|c| c.name.clone())
            .unwrap_or_default();
        let thumbnail = self
            .thumbnail
            .as_ref()
            .map(|t| t.file_name.clone())
            .or_else(|| self.image_url.clone());

        Preview {
            title: self.title.clone(),
            category_name,
            thumbnail,
            body: self.extractor.preview(&self.content.borrow()),
        }
    }

    /// Validate and lock the form for submission
    pub fn begin_submit(&mut self) -> Result<PendingSubmission> {
        if self.submitting {
            return Err(EditorError::SubmissionInFlight);
        }
        let errors = self.validate();
        if !errors.is_empty() {
            return Err(EditorError::Validation(errors));
        }

        self.submitting = true;
        self.error = None;
        self.success = None;
        Ok(PendingSubmission {
            mode: self.mode.clone(),
            payload: ArticlePayload {
                title: self.title.clone(),
                content: self.content(),
                category_id: self.category_id.clone(),
                image_url: self.image_url.clone().unwrap_or_default(),
            },
            thumbnail: self.thumbnail.clone(),
        })
    }

    /// Record the outcome of a sent submission and unlock the form
    ///
    /// Returns the success message, or the error after recording its
    /// user-facing message. Editor content is untouched either way.
    pub fn finish_submit(&mut self, outcome: Result<Article>) -> Result<String> {
        self.submitting = false;
        match outcome {
            Ok(article) => {
                let message = match self.mode {
                    FormMode::Create => "Article created successfully!",
                    FormMode::Edit(_) => "Article updated successfully!",
                };
                info!("Article {} saved", article.id);
                if self.mode == FormMode::Create {
                    self.mode = FormMode::Edit(article.id.clone());
                }
                self.image_url = article.image_url.filter(|url| !url.is_empty());
                self.thumbnail = None;
                self.success = Some(message.to_string());
                Ok(message.to_string())
            }
            Err(e) => {
                warn!("Article submission failed: {}", e);
                let message = match (&e, &self.mode) {
                    (EditorError::Upload(_), _) => UPLOAD_FAILED.to_string(),
                    (EditorError::Api(detail), FormMode::Create) => {
                        format!("Failed to create article: {}", detail)
                    }
                    (EditorError::Api(detail), FormMode::Edit(_)) => {
                        format!("Failed to update article: {}", detail)
                    }
                    (other, _) => other.to_string(),
                };
                self.error = Some(message);
                Err(e)
            }
        }
    }

    /// Validate, send, and record the outcome in one call
    pub fn submit<A>(&mut self, api: &mut A) -> Result<String>
    where
        A: ContentApi,
        A::Error: fmt::Display,
    {
        let pending = self.begin_submit()?;
        let outcome = pending.send(api);
        self.finish_submit(outcome)
    }
}
