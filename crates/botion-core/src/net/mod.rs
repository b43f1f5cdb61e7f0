pub mod dhcp;
pub mod form;
pub mod http;
