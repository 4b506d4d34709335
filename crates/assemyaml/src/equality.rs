//! deep, tag-aware node equality
//!
//! Used to find duplicate mapping keys while merging and to compare documents in tests.
//! Marks are ignored.
use crate::node::{Content, Node, Tag};
use crate::scalar;

/// Structural equality of two nodes
///
/// - different tags are never equal
/// - core scalars compare by value (`0x10` equals `16`, `yes` equals `on`)
/// - sequences, ordered maps and pairs compare in order
/// - mappings and sets compare regardless of order
/// - custom tags compare by shape
pub fn nodes_equal(a: &Node, b: &Node) -> bool {
    if a.tag != b.tag {
        return false;
    }

    match &a.tag {
        Tag::Null => true,
        Tag::Bool => scalars_equal(a, b, scalar::bool_value),
        Tag::Int => scalars_equal(a, b, scalar::int_value),
        Tag::Float => scalars_equal(a, b, scalar::float_value),
        Tag::Timestamp => scalars_equal(a, b, scalar::timestamp_value),
        Tag::Binary => scalars_equal(a, b, |text| Some(scalar::binary_value(text))),
        Tag::Str => a.as_scalar() == b.as_scalar(),
        Tag::Seq | Tag::Omap | Tag::Pairs => ordered_equal(&a.content, &b.content),
        Tag::Map | Tag::Set => unordered_equal(&a.content, &b.content),
        Tag::Custom(tag) => {
            tracing::debug!(tag = %tag, "no dedicated comparator, comparing by shape");
            match (&a.content, &b.content) {
                (Content::Scalar(a), Content::Scalar(b)) => a == b,
                (Content::Sequence(_), Content::Sequence(_)) => ordered_equal(&a.content, &b.content),
                (Content::Pairs(_), Content::Pairs(_)) => unordered_equal(&a.content, &b.content),
                _ => false,
            }
        }
    }
}

/// Compare parsed values, text that does not parse only equals identical text
fn scalars_equal<T: PartialEq>(a: &Node, b: &Node, value: impl Fn(&str) -> Option<T>) -> bool {
    let (Some(a), Some(b)) = (a.as_scalar(), b.as_scalar()) else {
        return false;
    };

    match (value(a), value(b)) {
        (Some(a), Some(b)) => a == b,
        (None, None) => a == b,
        _ => false,
    }
}

fn ordered_equal(a: &Content, b: &Content) -> bool {
    match (a, b) {
        (Content::Sequence(a), Content::Sequence(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(a, b)| nodes_equal(a, b))
        }
        (Content::Pairs(a), Content::Pairs(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(a, b)| pairs_equal(a, b))
        }
        _ => false,
    }
}

/// Every entry of `a` needs its own, equal entry in `b`
fn unordered_equal(a: &Content, b: &Content) -> bool {
    let (Content::Pairs(a), Content::Pairs(b)) = (a, b) else {
        return false;
    };

    if a.len() != b.len() {
        return false;
    }

    let mut matched = vec![false; b.len()];
    a.iter().all(|entry| {
        let found = b
            .iter()
            .enumerate()
            .position(|(index, candidate)| !matched[index] && pairs_equal(entry, candidate));

        match found {
            Some(index) => {
                matched[index] = true;
                true
            }
            None => false,
        }
    })
}

fn pairs_equal((a_key, a_value): &(Node, Node), (b_key, b_value): &(Node, Node)) -> bool {
    nodes_equal(a_key, b_key) && nodes_equal(a_value, b_value)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::node::Mark;

    fn string(text: &str) -> Node {
        Node::scalar(Tag::Str, text, Mark::default())
    }

    fn custom(tag: &str) -> Tag {
        Tag::Custom(format!("tag:yaml.org,2002:{tag}"))
    }

    fn set(members: &[&str]) -> Node {
        let pairs = members
            .iter()
            .map(|member| (string(member), Node::null(Mark::default())))
            .collect();
        Node::mapping(Tag::Set, pairs, Mark::default())
    }

    fn map(tag: Tag, entries: &[(&str, &str)]) -> Node {
        let pairs = entries.iter().map(|(k, v)| (string(k), string(v))).collect();
        Node::mapping(tag, pairs, Mark::default())
    }

    fn seq(tag: Tag, items: &[&str]) -> Node {
        Node::sequence(tag, items.iter().map(|item| string(item)).collect(), Mark::default())
    }

    #[test]
    fn unequal_tags() {
        let a = string("foo");
        let b = Node::scalar(custom("bar"), "foo", Mark::default());
        assert!(!nodes_equal(&a, &b));
    }

    #[test]
    fn unknown_tags_compare_by_shape() {
        let scalar = |text| Node::scalar(custom("xyz"), text, Mark::default());
        assert!(nodes_equal(&scalar("foo"), &scalar("foo")));
        assert!(!nodes_equal(&scalar("foo"), &scalar("bar")));

        assert!(nodes_equal(&seq(custom("xyz"), &["foo"]), &seq(custom("xyz"), &["foo"])));
        assert!(!nodes_equal(&seq(custom("xyz"), &["foo"]), &seq(custom("xyz"), &["bar"])));

        let a = map(custom("xyz"), &[("foo", "bar")]);
        let b = map(custom("xyz"), &[("foo", "bar")]);
        let c = map(custom("xyz"), &[("foo", "baz")]);
        assert!(nodes_equal(&a, &b));
        assert!(!nodes_equal(&a, &c));
    }

    #[test]
    fn unknown_tags_with_different_shapes() {
        let a = Node::scalar(custom("xyz"), "foo", Mark::default());
        let b = seq(custom("xyz"), &["foo"]);
        assert!(!nodes_equal(&a, &b));
    }

    #[test]
    fn sequences_compare_in_order() {
        let empty = seq(Tag::Seq, &[]);
        let one = seq(Tag::Seq, &["foo"]);
        let two = seq(Tag::Seq, &["foo", "bar"]);
        let two_again = seq(Tag::Seq, &["foo", "bar"]);
        let reversed = seq(Tag::Seq, &["bar", "foo"]);

        assert!(!nodes_equal(&empty, &one));
        assert!(!nodes_equal(&empty, &two));
        assert!(!nodes_equal(&one, &two));
        assert!(nodes_equal(&two, &two_again));
        assert!(nodes_equal(&two_again, &two));
        assert!(!nodes_equal(&two, &reversed));
    }

    #[test]
    fn sets_ignore_order() {
        assert!(nodes_equal(&set(&["A", "B"]), &set(&["B", "A"])));
        assert!(!nodes_equal(&set(&["A", "B"]), &set(&["A", "C"])));
        assert!(!nodes_equal(&set(&["a", "b"]), &set(&["b", "a", "c"])));
        assert!(!nodes_equal(&set(&["b", "a", "c"]), &set(&["a", "b"])));
        assert!(!nodes_equal(&set(&["b", "a", "c"]), &set(&["b", "a", "d"])));
    }

    #[test]
    fn sets_match_each_member_once() {
        assert!(!nodes_equal(&set(&["a", "a"]), &set(&["a", "b"])));
    }

    #[test]
    fn mappings_ignore_order() {
        let a = map(Tag::Map, &[("a", "foo"), ("b", "bar")]);
        let b = map(Tag::Map, &[("b", "bar"), ("a", "foo")]);
        let c = map(Tag::Map, &[("a", "bar"), ("b", "foo"), ("c", "baz")]);
        let d = map(Tag::Map, &[("a", "bar"), ("b", "foo"), ("c", "xxx")]);
        let e = map(Tag::Map, &[("a", "bar"), ("b", "foo"), ("d", "xxx")]);

        assert!(nodes_equal(&a, &b));
        assert!(nodes_equal(&b, &a));
        assert!(!nodes_equal(&a, &c));
        assert!(!nodes_equal(&c, &d));
        assert!(!nodes_equal(&d, &e));
    }

    #[test]
    fn ordered_maps_respect_order() {
        let a = map(Tag::Omap, &[("a", "1"), ("b", "2")]);
        let b = map(Tag::Omap, &[("b", "2"), ("a", "1")]);
        assert!(!nodes_equal(&a, &b));
        assert!(!nodes_equal(&a, &map(Tag::Map, &[("a", "1"), ("b", "2")])));
    }

    #[test]
    fn scalars_compare_by_value() {
        let int = |text| Node::scalar(Tag::Int, text, Mark::default());
        assert!(nodes_equal(&int("0x10"), &int("16")));
        assert!(!nodes_equal(&int("0x10"), &int("17")));

        let boolean = |text| Node::scalar(Tag::Bool, text, Mark::default());
        assert!(nodes_equal(&boolean("yes"), &boolean("On")));

        let float = |text| Node::scalar(Tag::Float, text, Mark::default());
        assert!(nodes_equal(&float("1.50"), &float("1.5")));
        assert!(!nodes_equal(&float(".nan"), &float(".nan")));

        let null = |text| Node::scalar(Tag::Null, text, Mark::default());
        assert!(nodes_equal(&null("~"), &null("")));

        let stamp = |text| Node::scalar(Tag::Timestamp, text, Mark::default());
        assert!(nodes_equal(
            &stamp("2001-12-14t21:59:43.10-05:00"),
            &stamp("2001-12-15 2:59:43.10")
        ));

        let binary = |text| Node::scalar(Tag::Binary, text, Mark::default());
        assert!(nodes_equal(&binary("R0lG\nODlh"), &binary("R0lGODlh")));
    }
}
