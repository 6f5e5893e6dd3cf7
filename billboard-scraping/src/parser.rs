pub mod chart_list;
pub mod search_result;
