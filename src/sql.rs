pub const UPDATE_TEMPLATE: &str =
    "UPDATE cms_con_docs t SET t.file = '{fileField}' WHERE t.id = {id};\n";

/// Renders one UPDATE statement. Single quotes in the field are doubled so the value stays
/// inside its string literal.
pub fn render_update(field: &str, id: i64) -> String {
    // The id goes in first so that field text is never rescanned for placeholders
    UPDATE_TEMPLATE
        .replacen("{id}", &id.to_string(), 1)
        .replacen("{fileField}", &field.replace('\'', "''"), 1)
}
