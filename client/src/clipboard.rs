use wasm_bindgen_futures::JsFuture;

/// Outcome of one copy attempt, as shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CopyOutcome {
    NothingSelected,
    Copied,
    Failed(String),
}

impl CopyOutcome {
    pub fn notice(&self) -> String {
        match self {
            Self::NothingSelected => "No provinces selected.".to_string(),
            Self::Copied => "Province IDs copied to clipboard.".to_string(),
            Self::Failed(e) => format!("Could not copy province IDs: {e}"),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

/// Write space-separated IDs to the system clipboard.
pub async fn copy_ids(text: String) -> CopyOutcome {
    if text.is_empty() {
        return CopyOutcome::NothingSelected;
    }
    match write_text(&text).await {
        Ok(()) => CopyOutcome::Copied,
        Err(e) => CopyOutcome::Failed(e),
    }
}

async fn write_text(text: &str) -> Result<(), String> {
    let window = web_sys::window().ok_or("no window")?;
    let promise = window.navigator().clipboard().write_text(text);
    JsFuture::from(promise)
        .await
        .map(|_| ())
        .map_err(|e| e.as_string().unwrap_or_else(|| format!("{e:?}")))
}

#[cfg(test)]
mod tests {
    use super::CopyOutcome;

    #[test]
    fn notices_distinguish_success_and_failure() {
        assert_eq!(
            CopyOutcome::Copied.notice(),
            "Province IDs copied to clipboard."
        );
        assert!(!CopyOutcome::Copied.is_error());

        let failed = CopyOutcome::Failed("NotAllowedError".into());
        assert_eq!(
            failed.notice(),
            "Could not copy province IDs: NotAllowedError"
        );
        assert!(failed.is_error());
        assert!(!CopyOutcome::NothingSelected.is_error());
    }
}
