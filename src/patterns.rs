//! Central catalog of the text patterns that find references.
//!
//! Each reference kind has a *complete* pattern, used for links and hovers,
//! which requires the closing quote, and an *in-progress* fragment pattern,
//! used for completion, which stops at the cursor's side of an unterminated
//! string. Identifiers never contain quotes or newlines, so no pattern can
//! run past the string it started in.

use std::ops::Range;
use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::types::{Reference, ReferenceKind};

/// Compile a catalog entry. Patterns are literals, so failure is a programming error.
#[allow(clippy::expect_used, reason = "pattern literals are checked by the catalog tests")]
fn compile(pattern: &str) -> Regex {
    return Regex::new(pattern).expect("valid catalog regex");
}

/// `@include('x')`, `@layout("x")`, `@component('x')`, `@!component('x')`.
pub static TEMPLATE_DIRECTIVE: LazyLock<Regex> = LazyLock::new(|| {
    return compile(r#"@(?P<kind>include|layout|!?component)\(\s*['"](?P<id>[^'"\n]+)['"]"#);
});

/// `view.render('x')`, `View.render('x')`, `view.renderSync('x')`.
pub static RENDER_CALL: LazyLock<Regex> = LazyLock::new(|| {
    return compile(r#"[Vv]iew\.render(?:Sync)?\(\s*['"](?P<id>[^'"\n]+)['"]"#);
});

/// A component used as a tag: Edge's `@card(` / `@!form.input(` or an element `<Card`.
/// Elements must start uppercase so plain HTML (`<header>`, `<button>`) never matches.
pub static COMPONENT_TAG: LazyLock<Regex> = LazyLock::new(|| {
    return compile(
        r"@!?(?P<tag>[A-Za-z_][A-Za-z0-9_]*(?:\.[A-Za-z_][A-Za-z0-9_]*)*)\(|<(?P<element>[A-Z][A-Za-z0-9_]*(?:\.[A-Za-z][A-Za-z0-9_]*)*)",
    );
});

/// `Route.get('/users', 'UsersController.index')`; `method` is optional.
pub static ROUTE_HANDLER: LazyLock<Regex> = LazyLock::new(|| {
    return compile(
        r#"[Rr]oute[r]?\.[A-Za-z]*\(\s*['"][^'"\n]*['"]\s*,\s*['"](?P<module>[^.'"\n]+)(?:\.(?P<method>[^.'"\n]+))?['"]"#,
    );
});

/// An unterminated template directive argument, possibly empty.
pub static TEMPLATE_FRAGMENT: LazyLock<Regex> = LazyLock::new(|| {
    return compile(r#"@(?:include|layout|!?component)\(\s*['"](?P<id>[^'"\n]*)"#);
});

/// An unterminated `view.render(` argument, possibly empty.
pub static RENDER_FRAGMENT: LazyLock<Regex> = LazyLock::new(|| {
    return compile(r#"[Vv]iew\.render(?:Sync)?\(\s*['"](?P<id>[^'"\n]*)"#);
});

/// An unterminated route handler. `method` participates once a `.` was typed.
pub static ROUTE_HANDLER_FRAGMENT: LazyLock<Regex> = LazyLock::new(|| {
    return compile(
        r#"[Rr]oute[r]?\.[A-Za-z]*\(\s*['"][^'"\n]*['"]\s*,\s*['"](?P<module>[^.'"\n]*)(?:\.(?P<method>[^.'"\n]*))?"#,
    );
});

/// A route handler split into its module and optional method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteHandler {
    /// Byte range of the method name, if one was written.
    pub method: Option<Range<usize>>,
    /// Byte range of the module path.
    pub module: Range<usize>,
}

impl RouteHandler {
    /// Byte range from the module start to the method end (or module end).
    pub fn full_span(&self) -> Range<usize> {
        let end = self.method.as_ref().map_or(self.module.end, |m| return m.end);
        return self.module.start..end;
    }

    /// The handler as written (`Module` or `Module.method`), as a reference into `text`.
    pub fn reference(&self, text: &str) -> Option<Reference> {
        let span = self.full_span();
        let raw_text = text.get(span.clone())?.to_string();
        return Some(Reference {
            kind: ReferenceKind::RouteHandler,
            match_span: span,
            raw_text,
        });
    }
}

/// Template directives (`@include` and friends) in `text`.
pub fn template_directives(text: &str) -> Vec<Reference> {
    return TEMPLATE_DIRECTIVE
        .captures_iter(text)
        .filter_map(|cap| {
            let kind = match cap.name("kind")?.as_str() {
                "include" => ReferenceKind::Include,
                "layout" => ReferenceKind::Layout,
                _ => ReferenceKind::Component,
            };
            return reference_from_group(&cap, "id", kind);
        })
        .collect();
}

/// `view.render()` targets in `text`.
pub fn render_calls(text: &str) -> Vec<Reference> {
    return RENDER_CALL
        .captures_iter(text)
        .filter_map(|cap| return reference_from_group(&cap, "id", ReferenceKind::Render))
        .collect();
}

/// Tag names that may name a component, in either tag form.
pub fn component_tags(text: &str) -> Vec<Reference> {
    return COMPONENT_TAG
        .captures_iter(text)
        .filter_map(|cap| {
            return reference_from_group(&cap, "tag", ReferenceKind::ComponentTag)
                .or_else(|| return reference_from_group(&cap, "element", ReferenceKind::ComponentTag));
        })
        .collect();
}

/// Complete route handler bindings in `text`.
pub fn route_handlers(text: &str) -> Vec<RouteHandler> {
    return ROUTE_HANDLER
        .captures_iter(text)
        .filter_map(|cap| return route_handler_from_captures(&cap))
        .collect();
}

/// The in-progress `id` fragment of `pattern` that contains `cursor`, as a byte range.
pub fn fragment_at(pattern: &Regex, text: &str, cursor: usize) -> Option<Range<usize>> {
    return pattern
        .captures_iter(text)
        .filter_map(|cap| return cap.name("id").map(|m| return m.range()))
        .find(|range| return range.start <= cursor && cursor <= range.end);
}

/// The in-progress route handler whose module or method contains `cursor`.
pub fn route_fragment_at(text: &str, cursor: usize) -> Option<RouteHandler> {
    return ROUTE_HANDLER_FRAGMENT
        .captures_iter(text)
        .filter_map(|cap| {
            let module = cap.name("module")?.range();
            let method = cap.name("method").map(|m| return m.range());
            return Some(RouteHandler { method, module });
        })
        .find(|handler| {
            let span = handler.full_span();
            return span.start <= cursor && cursor <= span.end;
        });
}

/// Build a `Reference` from a named group, skipping empty or absent captures.
fn reference_from_group(cap: &Captures<'_>, group: &str, kind: ReferenceKind) -> Option<Reference> {
    let m = cap.name(group)?;
    if m.as_str().trim().is_empty() {
        return None;
    }
    return Some(Reference {
        kind,
        match_span: m.range(),
        raw_text: m.as_str().to_string(),
    });
}

fn route_handler_from_captures(cap: &Captures<'_>) -> Option<RouteHandler> {
    let module = cap.name("module")?;
    if module.as_str().trim().is_empty() {
        return None;
    }
    return Some(RouteHandler {
        method: cap.name("method").map(|m| return m.range()),
        module: module.range(),
    });
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing, reason = "tests")]
mod tests {
    use super::*;

    fn raw(refs: &[Reference]) -> Vec<&str> {
        return refs.iter().map(|r| return r.raw_text.as_str()).collect();
    }

    #[test]
    fn catalog_compiles() {
        for pattern in [
            &TEMPLATE_DIRECTIVE,
            &RENDER_CALL,
            &COMPONENT_TAG,
            &ROUTE_HANDLER,
            &TEMPLATE_FRAGMENT,
            &RENDER_FRAGMENT,
            &ROUTE_HANDLER_FRAGMENT,
        ] {
            assert!(pattern.captures_len() > 1);
        }
    }

    #[test]
    fn finds_every_directive() {
        let text = "@layout('layouts.main')\n@include(\"partials/nav\") @!component('components.card', { x: 1 })\n@component('modal')";
        let refs = template_directives(text);
        assert_eq!(raw(&refs), ["layouts.main", "partials/nav", "components.card", "modal"]);
        assert_eq!(refs[0].kind, ReferenceKind::Layout);
        assert_eq!(refs[1].kind, ReferenceKind::Include);
        assert_eq!(refs[2].kind, ReferenceKind::Component);
        assert_eq!(&text[refs[1].match_span.clone()], "partials/nav");
    }

    #[test]
    fn unterminated_directive_is_not_complete() {
        assert!(template_directives("@include('partials.na").is_empty());
        assert!(template_directives("@include('partials\n.nav')").is_empty());
    }

    #[test]
    fn empty_directive_is_skipped() {
        assert!(template_directives("@include('')").is_empty());
    }

    #[test]
    fn render_calls_stop_at_closing_quote() {
        let text = "return view.render('users/show', { user }) || View.renderSync(\"home\", 'x')";
        assert_eq!(raw(&render_calls(text)), ["users/show", "home"]);
    }

    #[test]
    fn component_tags_in_both_forms() {
        let text = "@!card({ title })\n@form.inputGroup()\n<MyCard title=\"x\">";
        assert_eq!(raw(&component_tags(text)), ["card", "form.inputGroup", "MyCard"]);
    }

    #[test]
    fn lowercase_elements_are_plain_html() {
        let text = "<header>title</header>\n<button>\n<Ui.Button>";
        assert_eq!(raw(&component_tags(text)), ["Ui.Button"]);
    }

    #[test]
    fn route_handler_with_and_without_method() {
        let text = "Route.get('/', 'HomeController')\nRouter.post(\"/users\", \"Admin/UsersController.store\")";
        let handlers = route_handlers(text);
        assert_eq!(handlers.len(), 2);
        assert_eq!(&text[handlers[0].module.clone()], "HomeController");
        assert!(handlers[0].method.is_none());
        assert_eq!(&text[handlers[1].module.clone()], "Admin/UsersController");
        assert_eq!(&text[handlers[1].method.clone().unwrap()], "store");
        assert_eq!(&text[handlers[1].full_span()], "Admin/UsersController.store");

        let reference = handlers[1].reference(text).unwrap();
        assert_eq!(reference.kind, ReferenceKind::RouteHandler);
        assert_eq!(reference.raw_text, "Admin/UsersController.store");
        assert_eq!(&text[reference.match_span], "Admin/UsersController.store");
    }

    #[test]
    fn fragment_found_at_open_quote() {
        let text = "@include('";
        let range = fragment_at(&TEMPLATE_FRAGMENT, text, text.len()).unwrap();
        assert!(range.is_empty());
        assert_eq!(range.start, text.len());
    }

    #[test]
    fn fragment_not_found_outside_quotes() {
        let text = "@include('partials.nav') and more";
        assert!(fragment_at(&TEMPLATE_FRAGMENT, text, text.len()).is_none());
        assert!(fragment_at(&TEMPLATE_FRAGMENT, text, 12).is_some());
    }

    #[test]
    fn route_fragment_switches_to_method_after_dot() {
        let text = "Router.get('/', 'UsersCon";
        let handler = route_fragment_at(text, text.len()).unwrap();
        assert!(handler.method.is_none());

        let text = "Router.get('/', 'UsersController.in";
        let handler = route_fragment_at(text, text.len()).unwrap();
        assert_eq!(&text[handler.method.clone().unwrap()], "in");
        assert_eq!(&text[handler.module.clone()], "UsersController");
    }
}
