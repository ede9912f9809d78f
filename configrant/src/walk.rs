//! Record walker: flattens nested records into leaf descriptors

use crate::error::Error;
use crate::field::{self, Built, Descriptor};
use crate::record::Record;

/// Collect the configurable leaf fields of `record`.
///
/// Fields appear in declaration order; the leaves of a nested record are
/// spliced in where the nested field is declared, and the nested field itself
/// gets no descriptor. Paths are dotted (`substruct.subname`).
///
/// Fails on the first malformed tag or unsupported field type, before any field
/// has been written.
pub fn flatten(record: &mut dyn Record) -> Result<Vec<Descriptor<'_>>, Error> {
    let mut descriptors = Vec::new();
    collect(record, None, &mut descriptors)?;
    Ok(descriptors)
}

fn collect<'a>(
    record: &'a mut dyn Record,
    prefix: Option<&str>,
    descriptors: &mut Vec<Descriptor<'a>>,
) -> Result<(), Error> {
    for field in record.fields() {
        let path = match prefix {
            Some(prefix) => format!("{prefix}.{}", field.name),
            None => field.name.to_string(),
        };

        match field::build(path, field)? {
            Built::Skipped => {}
            Built::Leaf(descriptor) => descriptors.push(descriptor),
            Built::Record { path, record } => collect(record, Some(&path), descriptors)?,
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::FieldRef;
    use crate::slot::{Member, Node};

    #[derive(Default)]
    struct Inner {
        subname: String,
        percent: f32,
    }

    impl Record for Inner {
        fn fields(&mut self) -> Vec<FieldRef<'_>> {
            vec![
                FieldRef::new("subname", &mut self.subname as &mut dyn Member)
                    .with_tag("env:WALK_SUBNAME_ENV,default:SubConfig"),
                FieldRef::new("percent", &mut self.percent as &mut dyn Member)
                    .with_tag("default:3.32"),
            ]
        }
    }

    impl Member for Inner {
        fn node(&mut self) -> Node<'_> {
            Node::Record(self)
        }

        fn is_record(&self) -> bool {
            true
        }
    }

    #[derive(Default)]
    struct Outer {
        url: String,
        hidden: u32,
        inner: Inner,
        optional: Option<Inner>,
        retries: i32,
    }

    impl Record for Outer {
        fn fields(&mut self) -> Vec<FieldRef<'_>> {
            vec![
                FieldRef::new("url", &mut self.url as &mut dyn Member)
                    .with_tag("default:http://localhost:3000"),
                FieldRef::new("hidden", &mut self.hidden as &mut dyn Member)
                    .with_tag("default:7")
                    .exported(false),
                FieldRef::new("inner", &mut self.inner as &mut dyn Member),
                FieldRef::new("optional", &mut self.optional as &mut dyn Member),
                FieldRef::new("retries", &mut self.retries as &mut dyn Member)
                    .with_tag("default:3"),
            ]
        }
    }

    #[test]
    fn test_flatten_order_and_paths() {
        let mut outer = Outer::default();
        let descriptors = flatten(&mut outer).unwrap();
        let paths: Vec<&str> = descriptors.iter().map(|d| d.path()).collect();
        assert_eq!(
            paths,
            vec![
                "url",
                "inner.subname",
                "inner.percent",
                "optional.subname",
                "optional.percent",
                "retries",
            ]
        );
    }

    #[test]
    fn test_flatten_allocates_optional_record() {
        let mut outer = Outer::default();
        flatten(&mut outer).unwrap();
        assert!(outer.optional.is_some());
        assert_eq!(outer.hidden, 0);
    }

    #[test]
    fn test_flatten_does_not_write() {
        let mut outer = Outer::default();
        flatten(&mut outer).unwrap();
        assert_eq!(outer.url, "");
        assert_eq!(outer.inner.subname, "");
        assert_eq!(outer.retries, 0);
    }

    struct Broken {
        inner: Inner,
        port: u16,
    }

    impl Record for Broken {
        fn fields(&mut self) -> Vec<FieldRef<'_>> {
            vec![
                FieldRef::new("inner", &mut self.inner as &mut dyn Member),
                FieldRef::new("port", &mut self.port as &mut dyn Member).with_tag("default"),
            ]
        }
    }

    #[test]
    fn test_flatten_fails_on_malformed_tag() {
        let mut broken = Broken {
            inner: Inner::default(),
            port: 0,
        };
        match flatten(&mut broken) {
            Err(Error::TagFormat { field, .. }) => assert_eq!(field, "port"),
            other => panic!("Expected TagFormat error, got {other:?}"),
        }
    }

    struct TaggedNested {
        inner: Inner,
        skipped: Option<Inner>,
    }

    impl Record for TaggedNested {
        fn fields(&mut self) -> Vec<FieldRef<'_>> {
            vec![
                FieldRef::new("inner", &mut self.inner as &mut dyn Member).with_tag("default"),
                FieldRef::new("skipped", &mut self.skipped as &mut dyn Member).with_tag("-"),
            ]
        }
    }

    #[test]
    fn test_flatten_ignores_nested_record_tag() {
        let mut nested = TaggedNested {
            inner: Inner::default(),
            skipped: None,
        };
        let descriptors = flatten(&mut nested).unwrap();
        let paths: Vec<&str> = descriptors.iter().map(|d| d.path()).collect();
        assert_eq!(paths, vec!["inner.subname", "inner.percent"]);
        drop(descriptors);

        // Excluded storage is never allocated
        assert!(nested.skipped.is_none());
    }
}
