//! Device command handlers.

use tabled::Tabled;

use simcii_core::{CoreError, Dashboard, DescriptionCounter, Device, FormInput};

use crate::cli::{DevicesArgs, DevicesCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct DeviceRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    nombre: String,
    #[tabled(rename = "Type")]
    tipo: String,
    #[tabled(rename = "Zone")]
    zona: String,
    #[tabled(rename = "Active")]
    activo: String,
    #[tabled(rename = "Description")]
    descripcion: String,
}

impl From<&Device> for DeviceRow {
    fn from(d: &Device) -> Self {
        Self {
            id: d.id.to_string(),
            nombre: d.nombre.clone(),
            tipo: d.tipo.clone(),
            zona: d.zona.clone(),
            activo: if d.activo { "yes" } else { "no" }.into(),
            descripcion: d.descripcion.clone().unwrap_or_default(),
        }
    }
}

fn detail(d: &Device) -> String {
    [
        format!("ID:          {}", d.id),
        format!("Name:        {}", d.nombre),
        format!("Type:        {}", d.tipo),
        format!("Zone:        {}", d.zona),
        format!("Active:      {}", d.activo),
        format!("Description: {}", d.descripcion.as_deref().unwrap_or("-")),
    ]
    .join("\n")
}

/// Warn (without rejecting) when the description passes the soft limit.
fn warn_if_over_limit(counter: DescriptionCounter, quiet: bool) {
    if counter.is_over_limit() && !quiet {
        eprintln!(
            "Note: description is {} characters {}, over the soft limit; saving it unchanged",
            counter.used,
            counter.label()
        );
    }
}

fn print_device(d: &Device, global: &GlobalOpts) -> Result<(), CliError> {
    let out = output::render_single(&global.output, d, detail, |d| d.id.to_string())?;
    output::print_output(&out, global.quiet);
    Ok(())
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    dashboard: &Dashboard,
    args: DevicesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        DevicesCommand::List => {
            dashboard.scheduler().refresh_devices().await?;
            let snap = dashboard.devices_snapshot();
            let out = output::render_list(
                &global.output,
                snap.as_slice(),
                |d| DeviceRow::from(d),
                |d| d.id.to_string(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        DevicesCommand::Create {
            nombre,
            tipo,
            zona,
            descripcion,
        } => {
            let mut form = dashboard.form_controller();
            form.open_for_create();

            if let Some(text) = descripcion {
                warn_if_over_limit(form.set_description(text), global.quiet);
            }
            let input = FormInput::new(nombre, tipo, zona)
                .with_descripcion(form.form().input.descripcion.clone());

            let created = form.submit(input).await?;
            if !global.quiet {
                eprintln!("Device created");
            }
            print_device(&created, global)
        }

        DevicesCommand::Update {
            id,
            nombre,
            tipo,
            zona,
            descripcion,
        } => {
            let id = util::parse_device_id(&id)?;
            dashboard.scheduler().refresh_devices().await?;
            let current = dashboard
                .store()
                .device_by_id(id)
                .ok_or(CoreError::DeviceNotFound { id })?;

            let mut form = dashboard.form_controller();
            form.open_for_edit(&current);
            if let Some(text) = descripcion {
                warn_if_over_limit(form.set_description(text), global.quiet);
            }

            let mut input = form.form().input.clone();
            if let Some(nombre) = nombre {
                input.nombre = nombre;
            }
            if let Some(tipo) = tipo {
                input.tipo = tipo;
            }
            if let Some(zona) = zona {
                input.zona = zona;
            }

            let updated = form
                .submit(input)
                .await
                .map_err(|e| util::device_error(e, id))?;
            if !global.quiet {
                eprintln!("Device updated");
            }
            print_device(&updated, global)
        }

        DevicesCommand::Delete { id } => {
            let id = util::parse_device_id(&id)?;
            // Best effort: a cached name makes a friendlier prompt.
            if let Err(e) = dashboard.scheduler().refresh_devices().await {
                tracing::debug!(error = %e, "could not list devices before delete");
            }

            let mut form = dashboard.form_controller();
            let prompt = form.request_delete(id);
            if !util::confirm(&prompt.message, global.yes)? {
                form.cancel_delete();
                if !global.quiet {
                    eprintln!("Cancelled");
                }
                return Ok(());
            }

            form
                .confirm_delete()
                .await
                .map_err(|e| util::device_error(e, id))?;
            if !global.quiet {
                eprintln!("Device {id} deleted");
            }
            Ok(())
        }
    }
}
