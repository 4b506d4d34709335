//! tree rewriting helpers
use crate::error::Result;
use crate::node::Node;

/// Rewrites nodes by value
pub trait FoldNode {
    fn fold_node(&mut self, node: Node) -> Result<Node>;
}

// blanket impl for FnMut
impl<F> FoldNode for F
where
    F: FnMut(Node) -> Result<Node>,
{
    fn fold_node(&mut self, node: Node) -> Result<Node> {
        self(node)
    }
}

/// Rewrite the children of `node` (keys included) before `node` itself
pub fn fold_post_order(node: Node, folder: &mut dyn FoldNode) -> Result<Node> {
    let node = node.try_map_children(|child| fold_post_order(child, folder))?;
    folder.fold_node(node)
}
