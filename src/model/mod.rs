pub mod academic;
pub mod status;
pub mod student;
pub mod teacher;
