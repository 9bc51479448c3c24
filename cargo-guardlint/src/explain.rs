//! Check explanations for `cargo guardlint explain`.

use colored::*;
use guardlint::CheckRegistry;

/// Detailed explanation of a check.
pub struct Explanation {
    pub code: &'static str,
    pub name: &'static str,
    pub category: &'static str,
    pub severity: &'static str,
    pub summary: &'static str,
    pub description: &'static str,
    pub example_bad: &'static str,
    pub example_good: &'static str,
    pub options: &'static [(&'static str, &'static str)],
}

/// Get explanation for a check id
pub fn get_explanation(code: &str) -> Option<Explanation> {
    match code.to_lowercase().as_str() {
        "call-pair-check" | "call-pair" => Some(Explanation {
            code: "call-pair-check",
            name: "call-pair",
            category: "Resource lifecycle",
            severity: "warning",
            summary: "Function calls an acquire operation but never calls the release operation",
            description: r#"
Triggers for every function definition whose body calls the acquire
operation (default `fopen`) and contains no call to the release operation
(default `fclose`) anywhere.

The search covers the whole body, including closures and nested functions
defined inside it. A single release call anywhere suppresses the finding,
whatever its position, branch or count relative to the acquire calls. The
check is deliberately coarse: it does not follow control flow and does not
track which handle is released.

The finding points at the first acquire call and names the function.
Callees are resolved through `use` imports, so `use libc::fopen as open;`
followed by `open(..)` is still an acquire call. Calls through closures or
local bindings are never matched.
"#,
            example_bad: r#"
unsafe fn read_header(path: *const c_char) -> u32 {
    let f = libc::fopen(path, MODE_READ.as_ptr());  // call-pair-check
    let mut buf = [0u8; 4];
    libc::fread(buf.as_mut_ptr().cast(), 1, 4, f);
    u32::from_le_bytes(buf)
}
"#,
            example_good: r#"
unsafe fn read_header(path: *const c_char) -> u32 {
    let f = libc::fopen(path, MODE_READ.as_ptr());
    let mut buf = [0u8; 4];
    libc::fread(buf.as_mut_ptr().cast(), 1, 4, f);
    libc::fclose(f);
    u32::from_le_bytes(buf)
}
"#,
            options: &[
                ("acquire", "callee that opens the resource (default \"fopen\")"),
                ("release", "callee that must appear in the same function (default \"fclose\")"),
                ("system-source", "\"skip\" (default) or \"include\" system source"),
            ],
        }),

        "persistent-data-check" | "persistent-data" => Some(Explanation {
            code: "persistent-data-check",
            name: "persistent-data",
            category: "Guarded mutation",
            severity: "warning",
            summary: "Persistent data written in a function that never calls a guard",
            description: r#"
Triggers for every assignment (`=` or a compound assignment) whose
left-hand side writes through the persistent-data member, when the nearest
enclosing function definition calls none of the guard operations (default
`Update` and `UpdateNoRecompute`).

The left-hand side is printed in canonical form, with a dereferenced member
access shown as `ptr->field`, and matched textually against
`m_pJPersistentObjectData->` and `m_pJPersistentObjectData ->`.

The check is flow-insensitive: a guard call anywhere in the function, even
after the write or in another branch, authorises every write in it.

Writes through a `Box` or reference field are spelled
`h.m_pJPersistentObjectData.foo` and have no `->` in printed form. They are
not reported unless `match-dot-access = true` is set under
`[rules.persistent-data]`.
"#,
            example_bad: r#"
unsafe fn rename(h: *mut Holder, name: Name) {
    (*(*h).m_pJPersistentObjectData).name = name;  // persistent-data-check
}
"#,
            example_good: r#"
unsafe fn rename(h: *mut Holder, name: Name) {
    Update(h);
    (*(*h).m_pJPersistentObjectData).name = name;
}
"#,
            options: &[
                ("member", "protected member name (default \"m_pJPersistentObjectData\")"),
                ("guards", "callees that authorise writes (default [\"Update\", \"UpdateNoRecompute\"])"),
                ("system-source", "\"include\" (default) or \"skip\" system source"),
                ("match-dot-access", "also match `member.` (default false)"),
                ("cache-guard-lookups", "look guards up once per function (default false)"),
            ],
        }),

        _ => None,
    }
}

/// Print a detailed explanation
pub fn print_explanation(explanation: &Explanation) {
    println!();
    println!(
        "{} {}",
        explanation.code.yellow().bold(),
        format!("({})", explanation.name).dimmed()
    );
    println!();

    println!("{}: {}", "Category".bold(), explanation.category);
    println!("{}: {}", "Default severity".bold(), match explanation.severity {
        "error" => explanation.severity.red().to_string(),
        "warning" => explanation.severity.yellow().to_string(),
        _ => explanation.severity.cyan().to_string(),
    });
    println!();

    println!("{}", "Summary".bold().underline());
    println!("{}", explanation.summary);
    println!();

    println!("{}", "Description".bold().underline());
    for line in explanation.description.trim().lines() {
        println!("{}", line);
    }
    println!();

    println!("{}", "Example (incorrect)".red().bold());
    println!("```rust");
    for line in explanation.example_bad.trim().lines() {
        println!("{}", line);
    }
    println!("```");
    println!();

    println!("{}", "Example (correct)".green().bold());
    println!("```rust");
    for line in explanation.example_good.trim().lines() {
        println!("{}", line);
    }
    println!("```");
    println!();

    if !explanation.options.is_empty() {
        println!("{}", format!("Options ([rules.{}])", explanation.name).bold().underline());
        for (key, text) in explanation.options {
            println!("  {} - {}", key.cyan(), text);
        }
        println!();
    }
}

/// List all registered checks
pub fn list_all_codes(registry: &CheckRegistry) {
    println!();
    println!("{}", "Available Checks".bold().underline());
    println!();

    for id in registry.names() {
        let summary = get_explanation(id).map(|e| e.summary).unwrap_or("");
        println!("    {} - {}", id.yellow(), summary);
    }

    println!();
    println!("{}", "Run `cargo guardlint explain <CHECK>` for detailed information".dimmed());
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_builtin_check_is_explained() {
        let registry = CheckRegistry::with_builtin_checks();
        for id in registry.names() {
            let explanation = get_explanation(id).unwrap();
            assert_eq!(explanation.code, id);
        }
    }

    #[test]
    fn test_persistent_data_mentions_dot_access() {
        let explanation = get_explanation("persistent-data-check").unwrap();
        assert!(explanation.description.contains("match-dot-access = true"));
    }

    #[test]
    fn test_short_names_and_case() {
        assert_eq!(get_explanation("CALL-PAIR").unwrap().code, "call-pair-check");
        assert!(get_explanation("no-such-check").is_none());
    }
}
