//! Small helpers over the `markup5ever_rcdom` tree

use crate::error::TemplateError;
use html5ever::tendril::TendrilSink;
use html5ever::{
    local_name, ns, parse_document, serialize, serialize::SerializeOpts,
    serialize::TraversalScope, Attribute, LocalName, ParseOpts, QualName,
};
use markup5ever_rcdom::{Handle, Node, NodeData, RcDom, SerializableHandle};
use std::cell::RefCell;
use std::rc::Rc;

/// Start tags that close an open `<p>` when a page is parsed, so a paragraph can never hold
/// them after a round trip.
const CLOSES_PARAGRAPH: &[&str] = &[
    "address", "article", "aside", "blockquote", "center", "details", "dialog", "dir", "div",
    "dl", "fieldset", "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5",
    "h6", "header", "hgroup", "hr", "listing", "main", "menu", "nav", "ol", "p", "pre",
    "section", "summary", "table", "ul", "xmp",
];

pub(crate) fn parse(html: &str) -> RcDom {
    parse_document(RcDom::default(), ParseOpts::default()).one(html)
}

/// Parse markup as the content of `context` and return the resulting top-level nodes,
/// detached from the scratch document they were parsed into.
pub(crate) fn parse_fragment(markup: &str, context: &Handle) -> Vec<Handle> {
    let context_name = match &context.data {
        NodeData::Element { name, .. } => name.clone(),
        _ => QualName::new(None, ns!(html), local_name!("body")),
    };
    let dom = html5ever::parse_fragment(
        RcDom::default(),
        ParseOpts::default(),
        context_name,
        Vec::new(),
        false,
    )
    .one(markup);
    let Some(root) = dom
        .document
        .children
        .borrow()
        .iter()
        .find(|node| is_element(node, "html"))
        .cloned()
    else {
        return Vec::new();
    };
    let nodes = std::mem::take(&mut *root.children.borrow_mut());
    for node in &nodes {
        node.parent.set(None);
    }
    nodes
}

pub(crate) fn is_element(node: &Handle, tag: &str) -> bool {
    matches!(&node.data, NodeData::Element { name, .. } if &*name.local == tag)
}

pub(crate) fn has_class(node: &Handle, class: &str) -> bool {
    match &node.data {
        NodeData::Element { attrs, .. } => attrs.borrow().iter().any(|attr| {
            &*attr.name.local == "class" && attr.value.split_whitespace().any(|c| c == class)
        }),
        _ => false,
    }
}

/// Every node below `root` in document order, `root` excluded.
pub(crate) fn descendants(root: &Handle) -> Vec<Handle> {
    let mut found = Vec::new();
    collect(root, &mut found);
    found
}

fn collect(node: &Handle, found: &mut Vec<Handle>) {
    for child in node.children.borrow().iter() {
        found.push(child.clone());
        collect(child, found);
    }
}

pub(crate) fn find_descendant(root: &Handle, predicate: impl Fn(&Handle) -> bool) -> Option<Handle> {
    descendants(root).into_iter().find(|node| predicate(node))
}

/// Concatenated text of every text node below `root`.
pub(crate) fn text_content(root: &Handle) -> String {
    let mut text = String::new();
    for node in descendants(root) {
        if let NodeData::Text { contents } = &node.data {
            text.push_str(&contents.borrow());
        }
    }
    text
}

/// Swap the children of `target` for the nodes parsed from `markup` and return the element
/// that now holds them. That is `target` itself, unless `target` is a `<p>` and the markup
/// carries block content: the paragraph is then swapped for a `<div>` with the same
/// attributes, and the caller must use the returned handle from here on.
pub(crate) fn replace_children(target: &Handle, markup: &str) -> Handle {
    let nodes = parse_fragment(markup, target);
    let old = std::mem::take(&mut *target.children.borrow_mut());
    for node in &old {
        node.parent.set(None);
    }

    let holder = if is_element(target, "p") && nodes.iter().any(holds_block) {
        tracing::warn!("paragraph region received block content, rewriting it as a div");
        retag(target, "div")
    } else {
        target.clone()
    };

    for node in &nodes {
        node.parent.set(Some(Rc::downgrade(&holder)));
    }
    *holder.children.borrow_mut() = nodes;
    holder
}

fn holds_block(node: &Handle) -> bool {
    let is_block = |n: &Handle| CLOSES_PARAGRAPH.iter().any(|tag| is_element(n, tag));
    is_block(node) || descendants(node).iter().any(is_block)
}

/// Put a childless `tag` element with the attributes of `node` where `node` sits in its parent.
fn retag(node: &Handle, tag: &str) -> Handle {
    let NodeData::Element { attrs, .. } = &node.data else {
        return node.clone();
    };
    let replacement = Node::new(NodeData::Element {
        name: QualName::new(None, ns!(html), LocalName::from(tag)),
        attrs: RefCell::new(attrs.borrow().clone()),
        template_contents: RefCell::new(None),
        mathml_annotation_xml_integration_point: false,
    });
    if let Some(parent) = node.parent.take().and_then(|weak| weak.upgrade()) {
        for child in parent.children.borrow_mut().iter_mut() {
            if Rc::ptr_eq(child, node) {
                *child = replacement.clone();
            }
        }
        replacement.parent.set(Some(Rc::downgrade(&parent)));
    }
    replacement
}

pub(crate) fn attribute(node: &Handle, name: &str) -> Option<String> {
    match &node.data {
        NodeData::Element { attrs, .. } => attrs
            .borrow()
            .iter()
            .find(|attr| &*attr.name.local == name)
            .map(|attr| attr.value.to_string()),
        _ => None,
    }
}

/// Remove `node`, and everything below it, from its parent.
pub(crate) fn detach(node: &Handle) {
    if let Some(parent) = node.parent.take().and_then(|weak| weak.upgrade()) {
        parent
            .children
            .borrow_mut()
            .retain(|child| !Rc::ptr_eq(child, node));
    }
}

pub(crate) fn set_attribute(node: &Handle, name: &str, value: &str) {
    if let NodeData::Element { attrs, .. } = &node.data {
        let mut attrs = attrs.borrow_mut();
        match attrs.iter_mut().find(|attr| &*attr.name.local == name) {
            Some(attr) => attr.value = value.into(),
            None => attrs.push(Attribute {
                name: QualName::new(None, ns!(), LocalName::from(name)),
                value: value.into(),
            }),
        }
    }
}

/// Serialize the children of `node`; on the document node this is the whole page.
pub(crate) fn inner_html(node: &Handle) -> Result<String, TemplateError> {
    let mut output = Vec::new();
    let opts = SerializeOpts {
        traversal_scope: TraversalScope::ChildrenOnly(None),
        ..Default::default()
    };
    serialize(&mut output, &SerializableHandle::from(node.clone()), opts)?;
    Ok(String::from_utf8(output)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn first(dom: &RcDom, tag: &str) -> Handle {
        find_descendant(&dom.document, |node| is_element(node, tag)).unwrap()
    }

    #[test]
    fn fragment_nodes_are_detached() {
        let dom = parse("<div></div>");
        let nodes = parse_fragment("a<br><br><strong>b</strong>", &first(&dom, "div"));
        assert_eq!(nodes.len(), 4);
        assert!(nodes.iter().all(|node| node.parent.take().is_none()));
    }

    #[test]
    fn fragments_parse_in_the_context_of_their_target() {
        let dom = parse("<table><tr><td>x</td></tr></table>");
        let nodes = parse_fragment("<li>one</li>", &first(&dom, "td"));
        assert_eq!(nodes.len(), 1);
        assert!(is_element(&nodes[0], "li"));
    }

    #[test]
    fn paragraph_with_block_content_becomes_a_div() {
        let dom = parse(r#"<body><p class="caption" id="c">old</p><span>after</span></body>"#);
        let p = first(&dom, "p");
        let holder = replace_children(&p, "<ul><li>a</li></ul>");

        assert!(is_element(&holder, "div"));
        assert!(has_class(&holder, "caption"));
        let html = inner_html(&dom.document).unwrap();
        assert!(html.contains(r#"<div class="caption" id="c"><ul><li>a</li></ul></div><span>after</span>"#));
        assert_eq!(inner_html(&parse(&html).document).unwrap(), html);
    }

    #[test]
    fn paragraph_with_inline_content_is_kept() {
        let dom = parse(r#"<p class="caption">old</p>"#);
        let p = first(&dom, "p");
        let holder = replace_children(&p, "<em>new</em>");
        assert!(Rc::ptr_eq(&holder, &p));
        assert_eq!(inner_html(&p).unwrap(), "<em>new</em>");
    }

    #[test]
    fn class_lists_are_matched_by_token() {
        let dom = parse(r#"<p class="lead article-title">x</p>"#);
        let p = find_descendant(&dom.document, |node| is_element(node, "p")).unwrap();
        assert!(has_class(&p, "article-title"));
        assert!(!has_class(&p, "article"));
    }

    #[test]
    fn detached_nodes_leave_the_tree() {
        let dom = parse("<div><a href=x>gone</a>kept</div>");
        detach(&first(&dom, "a"));
        assert_eq!(inner_html(&first(&dom, "div")).unwrap(), "kept");
    }

    #[test]
    fn replaced_children_serialize_back() {
        let dom = parse("<div id=target>old</div>");
        let div = find_descendant(&dom.document, |node| is_element(node, "div")).unwrap();
        let holder = replace_children(&div, "new <em>text</em>");
        assert!(Rc::ptr_eq(&holder, &div));
        assert_eq!(inner_html(&div).unwrap(), "new <em>text</em>");
    }
}
