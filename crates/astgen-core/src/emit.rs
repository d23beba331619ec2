pub const ACCESSOR_TRAIT: &str = "GetNodeId";
pub const ACCESSOR_FN: &str = "get_node_id";
pub const NODE_ID_TY: &str = "NodeId";

/// Renders `impl GetNodeId for <record>` returning `self.<field>` by value.
///
/// The block ends with a newline. Node ids are `Copy`, so the field is not borrowed.
pub fn emit_accessor(record: &str, field: &str) -> String {
    let mut out = String::new();
    out.push_str(&format!("impl {ACCESSOR_TRAIT} for {record} {{\n"));
    out.push_str(&format!("    fn {ACCESSOR_FN}(&self) -> {NODE_ID_TY} {{\n"));
    out.push_str(&format!("        self.{field}\n"));
    out.push_str("    }\n");
    out.push_str("}\n");
    out
}
