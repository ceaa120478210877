//! ASCII rendering of version trees.

use crate::models::VersionTreeNode;

const SNAPSHOT: char = '●';
const DRAFT: char = '○';
const ACTIVE_MARKER: &str = " *";

fn state_symbol(node: &VersionTreeNode) -> char {
    if node.is_snapshot() {
        SNAPSHOT
    } else {
        DRAFT
    }
}

/// Render a version tree with snapshot/draft symbols, messages and the active
/// version marked with `*`.
///
/// Example output:
/// ```text
/// V0 "Initial Snapshot"
/// ├── ● V1 "outline"
/// │   ├── ● V2 "first draft"
/// │   └── ○ V4 *
/// └── ○ V3
/// ```
pub fn render_version_tree(root: &VersionTreeNode) -> String {
    let mut output = String::new();
    render_node(&mut output, root, "", true, true);
    output
}

fn render_node(
    output: &mut String,
    node: &VersionTreeNode,
    prefix: &str,
    is_last: bool,
    is_root: bool,
) {
    if !is_root {
        let branch = if is_last { "└── " } else { "├── " };
        output.push_str(prefix);
        output.push_str(branch);
        output.push(state_symbol(node));
        output.push(' ');
    }
    output.push('V');
    output.push_str(&node.id.to_string());
    if !node.message.is_empty() {
        output.push_str(" \"");
        output.push_str(&node.message);
        output.push('"');
    }
    if node.active {
        output.push_str(ACTIVE_MARKER);
    }
    output.push('\n');

    let child_prefix = if is_root {
        String::new()
    } else {
        let continuation = if is_last { "    " } else { "│   " };
        format!("{}{}", prefix, continuation)
    };

    for (i, child) in node.children.iter().enumerate() {
        let child_is_last = i == node.children.len() - 1;
        render_node(output, child, &child_prefix, child_is_last, false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn make_node(
        id: u32,
        message: &str,
        snapshot: bool,
        children: Vec<VersionTreeNode>,
    ) -> VersionTreeNode {
        VersionTreeNode {
            id,
            content: String::new(),
            message: message.to_string(),
            created_at: Utc::now(),
            last_modified_at: Utc::now(),
            snapshot_at: snapshot.then(Utc::now),
            active: false,
            children,
        }
    }

    #[test]
    fn test_single_root() {
        let mut root = make_node(0, "Initial Snapshot", true, vec![]);
        root.active = true;
        assert_eq!(render_version_tree(&root), "V0 \"Initial Snapshot\" *\n");
    }

    #[test]
    fn test_with_children() {
        let mut draft = make_node(2, "", false, vec![]);
        draft.active = true;
        let root = make_node(
            0,
            "Initial Snapshot",
            true,
            vec![make_node(1, "outline", true, vec![]), draft],
        );
        assert_eq!(
            render_version_tree(&root),
            "V0 \"Initial Snapshot\"\n├── ● V1 \"outline\"\n└── ○ V2 *\n"
        );
    }

    #[test]
    fn test_nested_children() {
        let root = make_node(
            0,
            "Initial Snapshot",
            true,
            vec![
                make_node(
                    1,
                    "outline",
                    true,
                    vec![
                        make_node(2, "first draft", true, vec![]),
                        make_node(4, "", false, vec![]),
                    ],
                ),
                make_node(3, "", false, vec![]),
            ],
        );
        let expected = "V0 \"Initial Snapshot\"\n├── ● V1 \"outline\"\n│   ├── ● V2 \"first draft\"\n│   └── ○ V4\n└── ○ V3\n";
        assert_eq!(render_version_tree(&root), expected);
    }
}
