pub mod tree_printer;
