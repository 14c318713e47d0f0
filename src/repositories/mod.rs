pub mod machine_repository;
pub mod operator_repository;
pub mod route_repository;
