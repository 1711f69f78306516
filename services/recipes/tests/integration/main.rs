mod helpers;
mod mark_test;
mod shopping_list_test;
