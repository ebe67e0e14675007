pub mod project_field;
