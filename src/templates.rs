use anyhow::{Context as _, Result};
use minijinja::Environment;
use serde_json::json;

use crate::manifest::Declaration;

// Generated text always uses `\n`; the emit layer owns platform EOLs.

const STAR_JS: &str = r#"const { __exportStar } = require('tslib');
__exportStar(require('{{ package }}'), exports);
"#;

const STAR_DTS: &str = "export * from '{{ package }}';\n";

const EQUAL_JS: &str = "module.exports = require('{{ package }}');\n";

const EQUAL_DTS: &str = r#"import {{ local }} = require('{{ package }}');
export = {{ local }};
"#;

const OPTIONAL_JS: &str = r#"module.exports = undefined;
try {
    module.exports = require('{{ package }}');
} catch (error) {
    if (error.code === 'MODULE_NOT_FOUND') {
        console.warn('{{ package }} not found');
    } else {
        throw error;
    }
}
"#;

const EXPORTS_MD: &str = r#"# {{ name }} re-exports

In order to make application builds more stable `{{ name }}` re-exports some
common dependencies for downstream packages to re-use.

## Usage example

Import a re-exported package by prefixing its name with `{{ name }}/shared/`:

```ts
import { something } from '{{ name }}/shared/some-package';
```

## List of re-exported packages

{{ package_list }}
"#;

/// Template environment preloaded with every embedded stub template.
pub fn environment() -> Result<Environment<'static>> {
    let mut env = Environment::new();
    env.set_keep_trailing_newline(true);
    env.add_template("star_js", STAR_JS)?;
    env.add_template("star_dts", STAR_DTS)?;
    env.add_template("equal_js", EQUAL_JS)?;
    env.add_template("equal_dts", EQUAL_DTS)?;
    env.add_template("optional_js", OPTIONAL_JS)?;
    env.add_template("exports_md", EXPORTS_MD)?;
    Ok(env)
}

fn render(env: &Environment, name: &str, ctx: &serde_json::Value) -> Result<String> {
    let tpl = env
        .get_template(name)
        .with_context(|| format!("unknown template: {name}"))?;
    let v = minijinja::value::Value::from_serialize(ctx);
    tpl.render(v)
        .with_context(|| format!("failed to render template: {name}"))
}

/// Implementation + type stub forwarding every named binding of the package.
pub fn star_stub(env: &Environment, decl: &Declaration) -> Result<(String, String)> {
    let ctx = json!({ "package": decl.package });
    Ok((render(env, "star_js", &ctx)?, render(env, "star_dts", &ctx)?))
}

/// Implementation + type stub forwarding the package's single module value
/// under the declared namespace.
pub fn equal_stub(env: &Environment, decl: &Declaration) -> Result<(String, String)> {
    let ctx = json!({ "package": decl.package, "local": decl.local });
    Ok((render(env, "equal_js", &ctx)?, render(env, "equal_dts", &ctx)?))
}

/// Like [`equal_stub`], but the implementation tolerates the package being
/// absent at runtime: a missing module leaves the export undefined with a
/// warning, any other load failure is re-thrown.
pub fn optional_stub(env: &Environment, decl: &Declaration) -> Result<(String, String)> {
    let ctx = json!({ "package": decl.package, "local": decl.local });
    Ok((render(env, "optional_js", &ctx)?, render(env, "equal_dts", &ctx)?))
}

/// The markdown index: one bullet per package, in the order given.
pub fn markdown_index(env: &Environment, name: &str, packages: &[String]) -> Result<String> {
    let package_list = packages
        .iter()
        .map(|p| format!(" - `{p}`"))
        .collect::<Vec<_>>()
        .join("\n");
    let ctx = json!({ "name": name, "package_list": package_list });
    render(env, "exports_md", &ctx)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decl(package: &str, local: &str) -> Declaration {
        Declaration {
            package: package.to_string(),
            local: local.to_string(),
        }
    }

    #[test]
    fn star_stub_renders_both_halves() {
        let env = environment().unwrap();
        let (js, dts) = star_stub(&env, &decl("lodash", "lodash")).unwrap();
        assert_eq!(
            js,
            "const { __exportStar } = require('tslib');\n__exportStar(require('lodash'), exports);\n"
        );
        assert_eq!(dts, "export * from 'lodash';\n");
    }

    #[test]
    fn equal_stub_renders_a_namespace_import() {
        let env = environment().unwrap();
        let (js, dts) = equal_stub(&env, &decl("inversify", "Inversify")).unwrap();
        assert_eq!(js, "module.exports = require('inversify');\n");
        assert_eq!(
            dts,
            "import Inversify = require('inversify');\nexport = Inversify;\n"
        );
    }

    #[test]
    fn optional_stub_guards_module_not_found() {
        let env = environment().unwrap();
        let (js, dts) = optional_stub(&env, &decl("@acme/electron", "Electron")).unwrap();
        assert!(js.starts_with("module.exports = undefined;\n"));
        assert!(js.contains("module.exports = require('@acme/electron');"));
        assert!(js.contains("if (error.code === 'MODULE_NOT_FOUND')"));
        assert!(js.contains("console.warn('@acme/electron not found');"));
        assert!(js.contains("throw error;"));
        assert_eq!(
            dts,
            "import Electron = require('@acme/electron');\nexport = Electron;\n"
        );
    }

    #[test]
    fn markdown_index_renders_one_bullet_per_package() {
        let env = environment().unwrap();
        let md = markdown_index(
            &env,
            "@acme/core",
            &["inversify".to_string(), "lodash".to_string()],
        )
        .unwrap();
        assert!(md.starts_with("# @acme/core re-exports\n"));
        assert!(md.contains("`@acme/core` re-exports some"));
        assert!(md.contains("\n - `inversify`\n - `lodash`\n"));
    }

    #[test]
    fn markdown_index_tolerates_an_empty_package_list() {
        let env = environment().unwrap();
        let md = markdown_index(&env, "@acme/core", &[]).unwrap();
        assert!(md.ends_with("## List of re-exported packages\n\n\n"));
    }
}
