//! Generator setting edits.

use std::sync::Arc;

use tracing::debug;

use synthdata_foundation::{ColumnId, GeneratorSettingId, ParamBag, Result, TableId};
use synthdata_storage::transform;
use synthdata_storage::{GeneratorSetting, RootStore};

use super::{active_project, apply_to_project, remote_failure};
use crate::catalog::GeneratorInfo;
use crate::remote::{GeneratorSettingCreate, GeneratorSettingWrite, GeneratorSettingWriter};

/// Creates, patches and deletes generator settings of the active project.
pub struct GeneratorFacade {
    store: Arc<RootStore>,
    writer: Arc<dyn GeneratorSettingWriter>,
}

impl GeneratorFacade {
    /// Creates a facade over `store`.
    pub fn new(store: Arc<RootStore>, writer: Arc<dyn GeneratorSettingWriter>) -> Self {
        Self { store, writer }
    }

    /// Creates a setting of kind `generator` and assigns it to a column.
    ///
    /// The setting starts with no parameters and a null frequency of 0. The
    /// setting and the column's reference appear in the store together, and
    /// only if the project that was active when the request went out is still
    /// active when the server answers.
    ///
    /// # Errors
    ///
    /// Fails with `NoActiveProject` when no project is loaded, or with the
    /// writer's error.
    pub async fn create_setting(
        &self,
        table_id: TableId,
        column_id: ColumnId,
        generator: &GeneratorInfo,
    ) -> Result<GeneratorSetting> {
        let project_id = active_project(&self.store, "create_setting")?;
        let body = GeneratorSettingCreate {
            table_id,
            column_id: Some(column_id),
            name: generator.name.clone(),
            params: ParamBag::new(),
            null_frequency: 0.0,
        };
        let setting = self
            .writer
            .create_setting(body)
            .await
            .map_err(remote_failure("create_setting"))?;
        debug!(
            table = %table_id,
            column = %column_id,
            setting = %setting.id(),
            generator = setting.name(),
            project = %project_id,
            "generator setting created"
        );
        apply_to_project(&self.store, project_id, |root| {
            transform::add_generator_setting(root, table_id, column_id, setting.clone())
        });
        Ok(setting)
    }

    /// Patches parameters, null frequency or kind of setting `setting_id`.
    ///
    /// # Errors
    ///
    /// Returns the writer's error.
    pub async fn patch_params(
        &self,
        table_id: TableId,
        setting_id: GeneratorSettingId,
        patch: GeneratorSettingWrite,
    ) -> Result<GeneratorSetting> {
        let setting = self
            .writer
            .patch_setting(setting_id, patch)
            .await
            .map_err(remote_failure("patch_generator_setting"))?;
        debug!(table = %table_id, setting = %setting_id, "generator setting patched");
        self.store.patch_generator_setting(table_id, setting.clone());
        Ok(setting)
    }

    /// Switches setting `setting_id` to another generator kind.
    ///
    /// # Errors
    ///
    /// Returns the writer's error.
    pub async fn patch_generator_name(
        &self,
        table_id: TableId,
        setting_id: GeneratorSettingId,
        generator: &GeneratorInfo,
    ) -> Result<GeneratorSetting> {
        let patch = GeneratorSettingWrite {
            name: Some(generator.name.clone()),
            ..GeneratorSettingWrite::default()
        };
        self.patch_params(table_id, setting_id, patch).await
    }

    /// Deletes setting `setting_id` and clears every column reference to it.
    ///
    /// # Errors
    ///
    /// Returns the writer's error.
    pub async fn delete_setting(
        &self,
        table_id: TableId,
        setting_id: GeneratorSettingId,
    ) -> Result<()> {
        self.writer
            .delete_setting(setting_id)
            .await
            .map_err(remote_failure("delete_generator_setting"))?;
        debug!(table = %table_id, setting = %setting_id, "generator setting deleted");
        self.store.delete_generator_setting(table_id, setting_id);
        Ok(())
    }
}
