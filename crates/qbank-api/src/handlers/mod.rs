pub mod question_download;
pub mod question_get;
pub mod question_list;
pub mod question_stats;
pub mod question_verify;
