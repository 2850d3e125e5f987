/// Declare an entity type from its field catalog.
///
/// Generates the struct, its [`FromRecord`](crate::entity::FromRecord) and
/// [`Entity`](crate::entity::Entity) impls, `load`, `Display`, a typed getter per
/// field and a `set_<field>` for writable fields only.
macro_rules! define_entity {
    (
        $(#[$meta:meta])*
        pub struct $name:ident;
        path($record:ident) => $path:expr;
        read_only { $($ro:ident: $ro_ty:ty),* $(,)? }
        writable { $($rw:ident: $rw_ty:ty),* $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone)]
        pub struct $name {
            record: $crate::entity::Record,
        }

        impl $crate::entity::FromRecord for $name {
            fn from_record(
                client: $crate::client::TelerivetClient,
                data: $crate::domain::Params,
                loaded: bool,
            ) -> Self {
                Self {
                    record: $crate::entity::Record::new(client, data, loaded),
                }
            }
        }

        impl $crate::entity::Entity for $name {
            const KIND: &'static str = stringify!($name);
            const READ_ONLY: &'static [&'static str] = &[$(stringify!($ro)),*];

            fn record(&self) -> &$crate::entity::Record {
                &self.record
            }

            fn record_mut(&mut self) -> &mut $crate::entity::Record {
                &mut self.record
            }

            fn api_path(&self) -> Result<String, $crate::client::TelerivetError> {
                let $record = &self.record;
                $path
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                self.record.fmt_with_kind(stringify!($name), f)
            }
        }

        impl $name {
            /// Fetch all fields unless already loaded.
            pub async fn load(&mut self) -> Result<&mut Self, $crate::client::TelerivetError> {
                let path = <Self as $crate::entity::Entity>::api_path(self)?;
                self.record.load(&path).await?;
                Ok(self)
            }

            $(
                pub fn $ro(&self) -> Result<Option<$ro_ty>, $crate::client::TelerivetError> {
                    self.record.field(stringify!($ro))
                }
            )*

            $(
                pub fn $rw(&self) -> Result<Option<$rw_ty>, $crate::client::TelerivetError> {
                    self.record.field(stringify!($rw))
                }

                ::paste::paste! {
                    pub fn [<set_ $rw>](
                        &mut self,
                        value: $rw_ty,
                    ) -> Result<(), $crate::client::TelerivetError> {
                        self.record
                            .set(stringify!($rw), ::serde_json::Value::from(value))
                    }
                }
            )*
        }
    };
}

pub(crate) use define_entity;
