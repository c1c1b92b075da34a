use inquire::InquireError;

/// Run an `inquire` prompt off the async runtime so timers and in-flight
/// requests keep progressing while the user types.
pub async fn blocking_prompt<T, F>(prompt: F) -> anyhow::Result<T>
where
    F: FnOnce() -> Result<T, InquireError> + Send + 'static,
    T: Send + 'static,
{
    Ok(tokio::task::spawn_blocking(prompt).await??)
}

/// Esc / Ctrl-C on a prompt.
pub fn is_cancel(err: &anyhow::Error) -> bool {
    matches!(
        err.downcast_ref::<InquireError>(),
        Some(InquireError::OperationCanceled | InquireError::OperationInterrupted)
    )
}
