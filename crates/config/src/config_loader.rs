/*
 * Copyright 2024 Fluence Labs Limited
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 * You may obtain a copy of the License at
 *
 *     http://www.apache.org/licenses/LICENSE-2.0
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the License for the specific language governing permissions and
 * limitations under the License.
 */

use config::Config;
use config::Environment;
use config::File;
use config::FileFormat;
use eyre::Context;

use crate::unresolved_config::UnresolvedNocacheConfig;
use crate::NocacheConfig;

/// Loads config from an optional TOML file, `NOCACHE__*` environment
/// variables take precedence over it.
pub fn load_config(path: Option<&str>) -> eyre::Result<NocacheConfig> {
    load_config_with_environment(path, environment_source())
}

/// Environment keys are lowercased by `config`, so `NOCACHE__LOGS__LOG_LEVEL`
/// becomes `logs.log_level`.
pub(crate) fn environment_source() -> Environment {
    Environment::with_prefix("NOCACHE")
        .separator("__")
        .try_parsing(true)
}

pub(crate) fn load_config_with_environment(
    path: Option<&str>,
    environment_source: Environment,
) -> eyre::Result<NocacheConfig> {
    let mut builder = Config::builder();
    if let Some(path) = path {
        let config_source = File::with_name(path)
            .required(true)
            .format(FileFormat::Toml);
        builder = builder.add_source(config_source);
    }

    let config = builder
        .add_source(environment_source)
        .build()
        .with_context(|| format!("Failed to load config from {path:?}"))?;

    let config: UnresolvedNocacheConfig = config
        .try_deserialize()
        .with_context(|| format!("Failed to parse config at {path:?}"))?;
    config.resolve()
}
