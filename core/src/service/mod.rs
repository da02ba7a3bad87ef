pub mod dto;
pub mod todo_service;
