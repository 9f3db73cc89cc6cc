use std::fmt::Display;

use dioxus::prelude::*;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum NoticeLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Notice {
    pub id: u64,
    pub level: NoticeLevel,
    pub message: String,
}

/// Notices kept on screen; pushing past this drops the oldest.
pub const MAX_NOTICES: usize = 5;

/// User-visible outcome messages, newest last.
#[derive(Clone, Debug, Default)]
pub struct Notices {
    pub entries: Vec<Notice>,
    next_id: u64,
}

impl Notices {
    pub fn push(&mut self, level: NoticeLevel, message: impl Into<String>) {
        let id = self.next_id;
        self.next_id += 1;
        self.entries.push(Notice {
            id,
            level,
            message: message.into(),
        });
        if self.entries.len() > MAX_NOTICES {
            let overflow = self.entries.len() - MAX_NOTICES;
            self.entries.drain(..overflow);
        }
    }

    pub fn dismiss(&mut self, id: u64) {
        self.entries.retain(|n| n.id != id);
    }

    pub fn has_errors(&self) -> bool {
        self.entries.iter().any(|n| n.level == NoticeLevel::Error)
    }
}

pub fn use_notices() -> Signal<Notices> {
    use_context::<Signal<Notices>>()
}

pub fn notify(notices: &mut Signal<Notices>, level: NoticeLevel, message: &str) {
    notices.write().push(level, message);
}

/// Surface the result of a backend operation: `success` on `Ok`, the error
/// prefixed with `action` otherwise.
pub fn report<T, E: Display>(
    notices: &mut Signal<Notices>,
    result: Result<T, E>,
    action: &str,
    success: &str,
) -> Option<T> {
    match result {
        Ok(value) => {
            if !success.is_empty() {
                notify(notices, NoticeLevel::Success, success);
            }
            Some(value)
        }
        Err(e) => {
            tracing::error!("{action} failed: {e}");
            notify(notices, NoticeLevel::Error, &format!("{action} failed: {e}"));
            None
        }
    }
}

/// Provides `Signal<Notices>` and renders the notice stack over its children.
#[component]
pub fn NoticeProvider(children: Element) -> Element {
    let notices = use_context_provider(|| Signal::new(Notices::default()));

    rsx! {
        {children}
        NoticePanel { notices }
    }
}

#[component]
fn NoticePanel(notices: Signal<Notices>) -> Element {
    let mut notices = notices;
    let entries = notices().entries;

    if entries.is_empty() {
        return rsx! {};
    }

    rsx! {
        div {
            class: "notice-stack",
            for entry in entries.into_iter().rev() {
                div {
                    key: "{entry.id}",
                    class: match entry.level {
                        NoticeLevel::Error => "notice notice-error",
                        NoticeLevel::Warning => "notice notice-warning",
                        NoticeLevel::Success => "notice notice-success",
                        NoticeLevel::Info => "notice notice-info",
                    },
                    span { "{entry.message}" }
                    button {
                        class: "notice-dismiss",
                        onclick: move |_| notices.write().dismiss(entry.id),
                        "×"
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_and_dismiss() {
        let mut notices = Notices::default();
        notices.push(NoticeLevel::Success, "Saved");
        notices.push(NoticeLevel::Error, "Deleting post failed: offline");
        assert!(notices.has_errors());

        let error_id = notices.entries[1].id;
        notices.dismiss(error_id);
        assert!(!notices.has_errors());
        assert_eq!(notices.entries.len(), 1);
        assert_eq!(notices.entries[0].message, "Saved");
    }

    #[test]
    fn test_oldest_notices_are_dropped() {
        let mut notices = Notices::default();
        for i in 0..MAX_NOTICES + 3 {
            notices.push(NoticeLevel::Info, format!("notice {i}"));
        }
        assert_eq!(notices.entries.len(), MAX_NOTICES);
        assert_eq!(notices.entries[0].message, "notice 3");
        assert_eq!(
            notices.entries.last().map(|n| n.message.as_str()),
            Some(format!("notice {}", MAX_NOTICES + 2).as_str())
        );
    }

    #[test]
    fn test_ids_are_not_reused() {
        let mut notices = Notices::default();
        notices.push(NoticeLevel::Info, "a");
        let first = notices.entries[0].id;
        notices.dismiss(first);
        notices.push(NoticeLevel::Info, "b");
        assert_ne!(notices.entries[0].id, first);
    }
}
