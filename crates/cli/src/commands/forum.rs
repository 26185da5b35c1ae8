//! Forum commands.
//!
//! Both commands drive a [`ForumBoard`] the same way an interactive front end
//! would, so messages match what users see in the browser.

use flower_shop_client::{ForumBoard, LoadStatus};
use flower_shop_core::{ForumCategory, ForumPost};

use super::{CliError, api_client};

fn print_posts(posts: &[ForumPost]) {
    #[allow(clippy::print_stdout)]
    {
        if posts.is_empty() {
            println!("No posts yet.");
        }
        for post in posts {
            println!(
                "[{}] {} ({})",
                post.category.label(),
                post.title,
                post.created_at.format("%Y-%m-%d %H:%M")
            );
            if let Some(content) = &post.content {
                println!("    {content}");
            }
        }
    }
}

/// List posts newest first, optionally for one board.
///
/// # Errors
///
/// Returns `CliError::Failed` if the posts cannot be loaded.
pub async fn list(category: Option<ForumCategory>) -> Result<(), CliError> {
    let client = api_client()?;

    let Some(category) = category else {
        print_posts(&client.forum_posts(None).await?);
        return Ok(());
    };

    let mut board = ForumBoard::new(category);
    board.begin_load(category);
    let result = client
        .forum_posts(Some(category))
        .await
        .map_err(|e| e.to_string());
    board.finish_load(category, result);

    let state = board.state(category);
    if state.status == LoadStatus::Error {
        return Err(CliError::Failed(
            state.message.clone().unwrap_or_default(),
        ));
    }
    print_posts(&state.posts);
    Ok(())
}

/// Create a post on `category`.
///
/// # Errors
///
/// Returns `CliError::Failed` with the board's message if the title is blank
/// or the API rejects the post.
pub async fn post(
    category: ForumCategory,
    title: &str,
    content: Option<&str>,
) -> Result<(), CliError> {
    let mut board = ForumBoard::new(category);
    board.toggle_form(category);
    board.edit_draft(category, title, content.unwrap_or_default());

    let failure = |board: &ForumBoard| {
        CliError::Failed(board.state(category).message.clone().unwrap_or_default())
    };

    let Some(new_post) = board.begin_submit(category) else {
        return Err(failure(&board));
    };

    let result = api_client()?
        .create_forum_post(&new_post)
        .await
        .map_err(|e| e.to_string());
    let created = result.is_ok();
    board.finish_submit(category, result);

    if !created {
        return Err(failure(&board));
    }

    #[allow(clippy::print_stdout)]
    if let Some(message) = &board.state(category).message {
        println!("{message}");
    }
    Ok(())
}
