mod shell;
pub use shell::Shell;

mod public;
pub use public::{Blog, Home, NotFound, Projects, Skills};

mod login;
pub use login::Login;

mod dashboard;
pub use dashboard::{Dashboard, DashboardLayout, DashboardPosts, DashboardProfile, DashboardProjects};
