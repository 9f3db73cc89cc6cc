//! Screens shared by the platform packages.
//!
//! Dashboard managers take a working copy of their `RecordManager` with
//! `start`, run the operation against it, then [`commit`] it back. A signal is
//! never held across an await, and the screen disables its controls while the
//! manager is busy.

use dioxus::prelude::*;
use store::{ManagerError, Outcome, Record, RecordManager};

use crate::notices::{notify, report, NoticeLevel, Notices};

mod modal_overlay;
pub use modal_overlay::{ConfirmDialog, ModalOverlay};

mod dashboard;
pub use dashboard::DashboardOverview;

mod projects_manager;
pub use projects_manager::ProjectsManager;

mod blog_manager;
pub use blog_manager::BlogManager;

mod profile_manager;
pub use profile_manager::ProfileManager;

mod home;
pub use home::HomeView;

mod gallery;
pub use gallery::ProjectsGallery;

mod blog;
pub use blog::BlogView;

mod skills;
pub use skills::SkillsView;

mod login;
pub use login::LoginForm;

/// Hand back the copy an operation ran against and report how it went.
pub(crate) fn commit<R: Record>(
    manager: &mut Signal<RecordManager<R>>,
    done: RecordManager<R>,
    result: Result<Outcome, ManagerError>,
    notices: &mut Signal<Notices>,
    action: &str,
    success: &str,
) {
    manager.write().finish(done);
    match report(notices, result, action, "") {
        Some(Outcome::Applied) if !success.is_empty() => {
            notify(notices, NoticeLevel::Success, success);
        }
        Some(Outcome::Skipped) => tracing::debug!("{action} skipped: no signed-in owner"),
        _ => {}
    }
}
