mod helper;

pub mod certificates;
pub mod student;
pub mod teacher;
