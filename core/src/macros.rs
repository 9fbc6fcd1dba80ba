//! The record declaration macro.
//!
//! [`record!`] turns a plain struct declaration into a persistable record
//! type: it prepends the identifier field, derives the usual traits, and
//! emits a [`Record`](crate::Record) impl backed by a `'static`
//! [`RecordDescriptor`](crate::RecordDescriptor) built from the declared
//! fields.

/// Declares a persistable record type.
///
/// The struct gains a leading `pub id: Option<i64>` identifier field and
/// derives `Debug`, `Clone`, `Default`, `PartialEq`; record equality is
/// field-wise, identifier included. The table name is the struct's simple
/// name and the data columns are the declared fields in declaration order.
/// Every field type must implement [`FieldValue`](crate::FieldValue), so an
/// unsupported field type fails to compile.
///
/// The `#[version(..)]` attribute is mandatory (the declared schema version,
/// validated as positive when the type is bound to a table). `#[index(col)]`
/// and `#[unique(col)]` declare secondary indexes over a declared column;
/// all `#[index]` entries must come before `#[unique]` entries.
///
/// # Examples
///
/// ```
/// use recordlite_core::{record, Record};
///
/// record! {
///     /// A note pinned to the board.
///     #[version(2)]
///     #[unique(slug)]
///     pub struct Note {
///         pub slug: String,
///         pub text: String,
///         pub stars: Option<i64>,
///     }
/// }
///
/// let note = Note::default();
/// assert!(note.is_new());
/// assert_eq!(Note::descriptor().table, "Note");
/// assert_eq!(Note::descriptor().version, 2);
/// ```
#[macro_export]
macro_rules! record {
    (
        $(#[doc = $doc:expr])*
        #[version($version:literal)]
        $(#[index($index_col:ident)])*
        $(#[unique($unique_col:ident)])*
        $vis:vis struct $name:ident {
            $(
                $(#[doc = $field_doc:expr])*
                $field_vis:vis $field:ident : $field_ty:ty
            ),* $(,)?
        }
    ) => {
        $(#[doc = $doc])*
        #[derive(Debug, Clone, Default, PartialEq)]
        $vis struct $name {
            /// Primary-key identifier; `None` until first persisted.
            pub id: Option<i64>,
            $(
                $(#[doc = $field_doc])*
                $field_vis $field: $field_ty,
            )*
        }

        impl $crate::Record for $name {
            fn descriptor() -> &'static $crate::RecordDescriptor {
                static DESCRIPTOR: $crate::RecordDescriptor = $crate::RecordDescriptor {
                    table: stringify!($name),
                    version: $version,
                    fields: &[
                        $(
                            $crate::FieldDescriptor {
                                name: stringify!($field),
                                kind: <$field_ty as $crate::FieldValue>::KIND,
                                nullable: <$field_ty as $crate::FieldValue>::NULLABLE,
                            },
                        )*
                    ],
                    indexes: &[
                        $(
                            $crate::IndexSpec {
                                column: stringify!($index_col),
                                unique: false,
                            },
                        )*
                        $(
                            $crate::IndexSpec {
                                column: stringify!($unique_col),
                                unique: true,
                            },
                        )*
                    ],
                };
                &DESCRIPTOR
            }

            fn id(&self) -> Option<i64> {
                self.id
            }

            fn set_id(&mut self, id: Option<i64>) {
                self.id = id;
            }

            fn values(&self) -> Vec<$crate::Value> {
                vec![
                    $($crate::FieldValue::to_value(&self.$field),)*
                ]
            }

            fn set_column(
                &mut self,
                column: &str,
                value: $crate::Value,
            ) -> ::std::result::Result<(), $crate::ValueError> {
                match column {
                    $crate::ID_COLUMN => {
                        self.id = <Option<i64> as $crate::FieldValue>::from_value(value)?;
                        Ok(())
                    }
                    $(
                        stringify!($field) => {
                            self.$field = <$field_ty as $crate::FieldValue>::from_value(value)?;
                            Ok(())
                        }
                    )*
                    other => Err($crate::ValueError::UnknownColumn {
                        column: other.to_string(),
                    }),
                }
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use crate::{FieldKind, IndexSpec, Record, Value};

    crate::record! {
        /// Library card on file for a borrower.
        #[version(3)]
        #[index(holder)]
        #[unique(number)]
        pub struct Card {
            /// Printed card number.
            pub number: String,
            pub holder: String,
            pub balance: f64,
            pub active: bool,
            pub note: Option<String>,
        }
    }

    crate::record! {
        #[version(1)]
        struct Marker {}
    }

    /// Expansion site with a one-argument `Result` alias in scope.
    mod aliased {
        pub type Result<T> = std::result::Result<T, String>;

        crate::record! {
            #[version(1)]
            pub struct Tag {
                pub label: String,
            }
        }

        pub fn relabel(tag: &mut Tag, label: &str) -> Result<()> {
            use crate::Record;
            tag.set_column("label", crate::Value::Text(label.to_string()))
                .map_err(|err| err.to_string())
        }
    }

    #[test]
    fn test_descriptor_from_declaration() {
        let d = Card::descriptor();
        assert_eq!(d.table, "Card");
        assert_eq!(d.version, 3);

        let names: Vec<&str> = d.fields.iter().map(|f| f.name).collect();
        assert_eq!(names, ["number", "holder", "balance", "active", "note"]);

        assert_eq!(d.field("balance").map(|f| f.kind), Some(FieldKind::Real));
        assert_eq!(d.field("active").map(|f| f.kind), Some(FieldKind::Integer));
        assert!(d.field("number").is_some_and(|f| !f.nullable));
        assert!(d.field("note").is_some_and(|f| f.nullable));

        assert_eq!(
            d.indexes,
            &[
                IndexSpec {
                    column: "holder",
                    unique: false
                },
                IndexSpec {
                    column: "number",
                    unique: true
                },
            ]
        );
    }

    #[test]
    fn test_default_record_is_new() {
        assert!(Card::default().is_new());
    }

    #[test]
    fn test_values_in_declaration_order() {
        let card = Card {
            id: None,
            number: "C-9".into(),
            holder: "ada".into(),
            balance: 2.5,
            active: true,
            note: Some("vip".into()),
        };
        assert_eq!(
            card.values(),
            vec![
                Value::Text("C-9".into()),
                Value::Text("ada".into()),
                Value::Real(2.5),
                Value::Integer(1),
                Value::Text("vip".into()),
            ]
        );
    }

    #[test]
    fn test_set_column_fills_fields() {
        let mut card = Card::default();
        card.set_column("id", Value::Integer(7)).unwrap();
        card.set_column("number", Value::Text("C-100".into())).unwrap();
        card.set_column("balance", Value::Real(0.5)).unwrap();
        card.set_column("active", Value::Integer(1)).unwrap();
        card.set_column("note", Value::Null).unwrap();

        assert_eq!(card.id, Some(7));
        assert_eq!(card.number, "C-100");
        assert_eq!(card.balance, 0.5);
        assert!(card.active);
        assert_eq!(card.note, None);
        assert!(card.set_column("nope", Value::Null).is_err());
    }

    #[test]
    fn test_equality_is_field_wise() {
        let mut a = Card::default();
        a.number = "C-1".into();
        a.balance = 1.0;
        let mut b = a.clone();
        assert_eq!(a, b);

        // Flip the least significant mantissa bit.
        b.balance = f64::from_bits(b.balance.to_bits() + 1);
        assert_ne!(a, b);

        let mut c = a.clone();
        c.id = Some(1);
        assert_ne!(a, c);
    }

    #[test]
    fn test_marker_record_has_only_identifier() {
        let d = Marker::descriptor();
        assert!(d.fields.is_empty());
        assert!(d.indexes.is_empty());
        assert!(Marker::default().values().is_empty());
    }

    #[test]
    fn test_expands_under_a_result_alias() {
        let mut tag = aliased::Tag::default();
        aliased::relabel(&mut tag, "urgent").unwrap();
        assert_eq!(tag.label, "urgent");
        assert_eq!(aliased::Tag::descriptor().table, "Tag");
    }
}
