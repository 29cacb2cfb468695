mod health;
mod post;
mod role;
mod user;

pub use health::health_check;
pub use post::related_posts;
pub use role::{check_my_permissions, list_roles, my_permissions, role_permissions};
pub use user::assign_role;
