//! Forum page state.
//!
//! The board keeps one [`BoardState`] per [`ForumCategory`]. Network calls
//! happen elsewhere; the caller reports their outcome back through
//! [`ForumBoard::finish_load`] and [`ForumBoard::finish_submit`].

use std::collections::HashMap;

use flower_shop_core::{ForumCategory, ForumPost, NewForumPost, ValidationError};

pub const LOAD_ERROR: &str = "Error loading posts.";
pub const TITLE_REQUIRED: &str = "Post title is required.";
pub const POST_CREATED: &str = "Post created successfully!";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadStatus {
    #[default]
    Idle,
    Loading,
    Loaded,
    Error,
}

/// Contents of the "new post" form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Draft {
    pub title: String,
    pub content: String,
}

#[derive(Debug, Clone, Default)]
pub struct BoardState {
    pub status: LoadStatus,
    /// Newest first.
    pub posts: Vec<ForumPost>,
    pub form_open: bool,
    pub draft: Draft,
    pub submitting: bool,
    pub message: Option<String>,
}

static UNTOUCHED: BoardState = BoardState {
    status: LoadStatus::Idle,
    posts: Vec::new(),
    form_open: false,
    draft: Draft {
        title: String::new(),
        content: String::new(),
    },
    submitting: false,
    message: None,
};

#[derive(Debug, Clone)]
pub struct ForumBoard {
    active: ForumCategory,
    states: HashMap<ForumCategory, BoardState>,
}

impl Default for ForumBoard {
    fn default() -> Self {
        Self::new(ForumCategory::TipsAndTricks)
    }
}

impl ForumBoard {
    #[must_use]
    pub fn new(active: ForumCategory) -> Self {
        let states = ForumCategory::ALL
            .into_iter()
            .map(|c| (c, BoardState::default()))
            .collect();
        Self { active, states }
    }

    #[must_use]
    pub const fn active(&self) -> ForumCategory {
        self.active
    }

    #[must_use]
    pub fn state(&self, category: ForumCategory) -> &BoardState {
        self.states.get(&category).unwrap_or(&UNTOUCHED)
    }

    fn state_mut(&mut self, category: ForumCategory) -> &mut BoardState {
        self.states.entry(category).or_default()
    }

    /// Switch tabs. Returns `true` when the new tab has no posts and should
    /// be loaded.
    pub fn set_active(&mut self, category: ForumCategory) -> bool {
        self.active = category;
        let state = self.state(category);
        state.posts.is_empty() && state.status != LoadStatus::Loading
    }

    pub fn begin_load(&mut self, category: ForumCategory) {
        let state = self.state_mut(category);
        state.status = LoadStatus::Loading;
        state.message = None;
    }

    pub fn finish_load(&mut self, category: ForumCategory, result: Result<Vec<ForumPost>, String>) {
        let state = self.state_mut(category);
        match result {
            Ok(mut posts) => {
                posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
                state.posts = posts;
                state.status = LoadStatus::Loaded;
            }
            Err(e) => {
                tracing::warn!(category = %category, error = %e, "Failed to load forum posts");
                state.status = LoadStatus::Error;
                state.message = Some(LOAD_ERROR.to_string());
            }
        }
    }

    /// Show or hide the form. Opening it clears any previous message.
    pub fn toggle_form(&mut self, category: ForumCategory) {
        let state = self.state_mut(category);
        state.form_open = !state.form_open;
        if state.form_open {
            state.message = None;
        }
    }

    pub fn edit_draft(&mut self, category: ForumCategory, title: &str, content: &str) {
        let state = self.state_mut(category);
        state.draft.title = title.to_string();
        state.draft.content = content.to_string();
    }

    /// Validate the draft and mark the tab as submitting.
    ///
    /// Returns the post to send, or `None` when the draft is invalid or a
    /// submission is already in flight.
    pub fn begin_submit(&mut self, category: ForumCategory) -> Option<NewForumPost> {
        let state = self.state_mut(category);
        if state.submitting {
            return None;
        }

        let draft = NewForumPost {
            title: state.draft.title.clone(),
            content: Some(state.draft.content.clone()),
            category,
        };
        match draft.validate() {
            Ok(post) => {
                state.submitting = true;
                state.message = None;
                Some(post)
            }
            Err(e) => {
                state.message = Some(match e {
                    ValidationError::Required(_) => TITLE_REQUIRED.to_string(),
                    other => other.to_string(),
                });
                None
            }
        }
    }

    pub fn finish_submit(&mut self, category: ForumCategory, result: Result<ForumPost, String>) {
        let state = self.state_mut(category);
        state.submitting = false;
        match result {
            Ok(post) => {
                state.posts.insert(0, post);
                state.draft = Draft::default();
                state.form_open = false;
                state.message = Some(POST_CREATED.to_string());
            }
            Err(e) => state.message = Some(e),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{TimeZone, Utc};
    use flower_shop_core::ForumPostId;

    use super::*;

    fn post(id: i32, day: u32) -> ForumPost {
        ForumPost {
            id: ForumPostId::new(id),
            title: format!("Post {id}"),
            content: None,
            category: ForumCategory::News,
            created_at: Utc.with_ymd_and_hms(2024, 5, day, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_set_active_requests_load_once() {
        let mut board = ForumBoard::default();
        assert!(board.set_active(ForumCategory::News));

        board.begin_load(ForumCategory::News);
        board.finish_load(ForumCategory::News, Ok(vec![post(1, 1)]));

        assert!(!board.set_active(ForumCategory::News));
        assert_eq!(board.active(), ForumCategory::News);
    }

    #[test]
    fn test_load_sorts_newest_first() {
        let mut board = ForumBoard::default();
        board.finish_load(ForumCategory::News, Ok(vec![post(1, 1), post(2, 3), post(3, 2)]));

        let ids: Vec<i32> = board
            .state(ForumCategory::News)
            .posts
            .iter()
            .map(|p| p.id.as_i32())
            .collect();
        assert_eq!(ids, vec![2, 3, 1]);
        assert_eq!(board.state(ForumCategory::News).status, LoadStatus::Loaded);
    }

    #[test]
    fn test_load_error_sets_message() {
        let mut board = ForumBoard::default();
        board.begin_load(ForumCategory::Support);
        board.finish_load(ForumCategory::Support, Err("connection refused".into()));

        let state = board.state(ForumCategory::Support);
        assert_eq!(state.status, LoadStatus::Error);
        assert_eq!(state.message.as_deref(), Some(LOAD_ERROR));
    }

    #[test]
    fn test_submit_requires_title() {
        let mut board = ForumBoard::default();
        board.toggle_form(ForumCategory::Requests);
        board.edit_draft(ForumCategory::Requests, "   ", "body");

        assert!(board.begin_submit(ForumCategory::Requests).is_none());
        let state = board.state(ForumCategory::Requests);
        assert_eq!(state.message.as_deref(), Some(TITLE_REQUIRED));
        assert!(!state.submitting);
    }

    #[test]
    fn test_submit_success_resets_form() {
        let mut board = ForumBoard::default();
        board.finish_load(ForumCategory::News, Ok(vec![post(1, 1)]));
        board.toggle_form(ForumCategory::News);
        board.edit_draft(ForumCategory::News, " Spring opening ", "");

        let new_post = board.begin_submit(ForumCategory::News).unwrap();
        assert_eq!(new_post.title, "Spring opening");
        assert_eq!(new_post.content, None);
        assert!(board.begin_submit(ForumCategory::News).is_none());

        board.finish_submit(ForumCategory::News, Ok(post(9, 4)));

        let state = board.state(ForumCategory::News);
        assert_eq!(state.posts.first().unwrap().id, ForumPostId::new(9));
        assert_eq!(state.draft, Draft::default());
        assert!(!state.form_open);
        assert!(!state.submitting);
        assert_eq!(state.message.as_deref(), Some(POST_CREATED));
    }

    #[test]
    fn test_submit_failure_keeps_draft() {
        let mut board = ForumBoard::default();
        board.edit_draft(ForumCategory::News, "Title", "Body");
        board.begin_submit(ForumCategory::News).unwrap();
        board.finish_submit(ForumCategory::News, Err("Server error".into()));

        let state = board.state(ForumCategory::News);
        assert_eq!(state.draft.title, "Title");
        assert_eq!(state.message.as_deref(), Some("Server error"));
        assert!(!state.submitting);
    }

    #[test]
    fn test_opening_form_clears_message() {
        let mut board = ForumBoard::default();
        board.finish_load(ForumCategory::News, Err("boom".into()));
        board.toggle_form(ForumCategory::News);
        assert!(board.state(ForumCategory::News).message.is_none());
    }

    #[test]
    fn test_categories_are_independent() {
        let mut board = ForumBoard::default();
        board.edit_draft(ForumCategory::News, "News draft", "");
        assert!(board.state(ForumCategory::Support).draft.title.is_empty());
    }
}
