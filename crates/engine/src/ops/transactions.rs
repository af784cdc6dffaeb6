mod impact;
mod list;
mod write;
