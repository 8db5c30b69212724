pub mod cart_panel;
pub mod nav_bar;
pub mod notice;
pub mod pizza_card;
