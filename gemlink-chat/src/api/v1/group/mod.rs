pub mod add_members;
pub mod admins;
pub mod invite;
pub mod join;
pub mod leave;
pub mod remove_member;
pub mod settings;
