pub mod announcement;
pub mod attendance;
pub mod event;
pub mod member;
pub mod push;
pub mod working_group;
