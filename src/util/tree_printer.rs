use std::fmt;

/// Draws box-art trees line by line.
#[derive(Debug, Default)]
pub struct TreePrinter {
    ancestors: Vec<bool>,
}

impl TreePrinter {
    pub fn new() -> Self {
        Self::default()
    }

    fn indent(&self) -> String {
        self.ancestors
            .iter()
            .map(|&is_last| if is_last { "    " } else { "│   " })
            .collect()
    }

    pub fn node(&self, out: &mut Vec<String>, last: bool, label: impl fmt::Display) {
        let branch = if last { "└── " } else { "├── " };
        out.push(format!("{}{branch}{label}", self.indent()));
    }

    pub fn child_scope<T>(&mut self, last: bool, f: impl FnOnce(&mut Self) -> T) -> T {
        self.ancestors.push(last);
        let res = f(self);
        self.ancestors.pop();
        res
    }
}

/// Something that renders as a labelled node with leaf fields and subtrees.
pub trait TreePrintable {
    fn label(&self) -> String;

    /// One-line children printed before the subtrees.
    fn fields(&self) -> Vec<String> {
        Vec::new()
    }

    fn subtrees(&self) -> Vec<&dyn TreePrintable> {
        Vec::new()
    }

    fn print_tree(&self, out: &mut Vec<String>, printer: &mut TreePrinter, last: bool) {
        printer.node(out, last, self.label());

        let fields = self.fields();
        let subtrees = self.subtrees();
        let total = fields.len() + subtrees.len();
        printer.child_scope(last, |printer| {
            for (i, field) in fields.iter().enumerate() {
                printer.node(out, i + 1 == total, field);
            }
            for (i, subtree) in subtrees.iter().enumerate() {
                subtree.print_tree(out, printer, fields.len() + i + 1 == total);
            }
        });
    }
}

/// Prints `items` as the top level of a tree.
pub fn print_forest(out: &mut Vec<String>, items: &[&dyn TreePrintable]) {
    let mut printer = TreePrinter::new();
    for (i, item) in items.iter().enumerate() {
        item.print_tree(out, &mut printer, i + 1 == items.len());
    }
}
