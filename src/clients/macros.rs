#[macro_export]
macro_rules! impl_client_methods {
    ($client_name:ident, $entity:ty, $error:ty, $entity_name_snake:ident) => {
        paste::paste! {
            #[allow(dead_code)]
            impl $client_name {
                #[tracing::instrument(skip(self))]
                pub async fn [<get_ $entity_name_snake>](&self, id: String) -> Result<Option<$entity>, $error> {
                    tracing::debug!("Sending request");
                    self.inner.get(id).await.map_err(<$error>::from)
                }

                #[tracing::instrument(skip(self))]
                pub async fn [<list_ $entity_name_snake s>](&self) -> Result<Vec<$entity>, $error> {
                    tracing::debug!("Sending request");
                    self.inner.list().await.map_err(<$error>::from)
                }

                /// Like `get`, but a missing record is an error.
                pub async fn [<require_ $entity_name_snake>](&self, id: String) -> Result<$entity, $error> {
                    self.[<get_ $entity_name_snake>](id.clone()).await?
                        .ok_or_else(|| <$error>::NotFound(id))
                }
            }
        }
    };
}

#[macro_export]
macro_rules! impl_client_new {
    ($client_name:ident, $entity:ty) => {
        impl $client_name {
            pub fn new(inner: $crate::actor_framework::ResourceClient<$entity>) -> Self {
                Self { inner }
            }
        }
    };
}

/// Folds framework failures into the entity error, which must carry
/// `NotFound`, `AlreadyExists` and `ActorCommunicationError` variants.
#[macro_export]
macro_rules! impl_framework_error {
    ($error:ty) => {
        impl From<$crate::actor_framework::FrameworkError<$error>> for $error {
            fn from(e: $crate::actor_framework::FrameworkError<$error>) -> Self {
                use $crate::actor_framework::FrameworkError;
                match e {
                    FrameworkError::NotFound(id) => <$error>::NotFound(id),
                    FrameworkError::AlreadyExists(id) => <$error>::AlreadyExists(id),
                    FrameworkError::Entity(inner) => inner,
                    other => <$error>::ActorCommunicationError(other.to_string()),
                }
            }
        }
    };
}

#[macro_export]
macro_rules! impl_basic_client {
    ($client_name:ident, $entity:ty, $error:ty, $entity_name_snake:ident) => {
        impl_client_new!($client_name, $entity);
        impl_client_methods!($client_name, $entity, $error, $entity_name_snake);
        impl_framework_error!($error);
    };
}
