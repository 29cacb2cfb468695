mod permissions;
mod related;
mod users;
