mod end_to_end;
mod properties;
mod streaming;
