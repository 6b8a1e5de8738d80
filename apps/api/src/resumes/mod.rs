// Stored resumes: load a record with its relations, translate it, optionally save the copy.

pub mod handlers;
pub mod repository;
