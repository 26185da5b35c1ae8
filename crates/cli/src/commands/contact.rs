//! Contact form command.

use flower_shop_client::ContactOutcome;
use flower_shop_core::{ContactRequest, ContactStatus};

use super::{CliError, api_client};

/// Send a contact message through the API.
///
/// Input is validated locally first so obvious mistakes never leave the
/// machine.
///
/// # Errors
///
/// Returns `CliError::Validation` for bad input, or `CliError::Failed` when
/// the shop could not take the message (retry later).
pub async fn send(request: &ContactRequest) -> Result<(), CliError> {
    request.validate()?;

    match api_client()?.send_contact(request).await {
        ContactOutcome::Delivered(status) => {
            #[allow(clippy::print_stdout)]
            {
                match status {
                    ContactStatus::Sent => println!("Thank you! Your message has been sent."),
                    ContactStatus::Queued => {
                        println!("Thank you! Your message has been received.");
                    }
                }
            }
            Ok(())
        }
        ContactOutcome::Rejected(message) => Err(CliError::Failed(message)),
        ContactOutcome::Failed(message) => Err(CliError::Failed(format!(
            "{message} (please try again later)"
        ))),
    }
}
