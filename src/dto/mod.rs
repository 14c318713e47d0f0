pub mod route_dto;
pub mod stop_dto;
