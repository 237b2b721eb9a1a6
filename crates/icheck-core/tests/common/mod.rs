#![allow(dead_code)]

pub mod watched_dir;
