pub mod dashboard;
pub mod history_table;
pub mod menu;
pub mod question_view;
pub mod session_sidebar;
pub mod timer_bar;
