//! Single-device tasks: telnet, SSH, sync suspension, password reset.

use secrecy::SecretString;
use serde::Serialize;

use ctools_core::{DeviceRef, Task};

use super::util::prompt_password;
use crate::cli::{DeviceArgs, EnableSshArgs, EnableTelnetArgs, GlobalOpts, ResetPasswordArgs};
use crate::config::PROMPT_SENTINEL;
use crate::error::CliError;
use crate::output::{print_output, render_single};

pub fn device_ref(args: DeviceArgs) -> DeviceRef {
    DeviceRef::new(args.tenant, args.device)
}

pub fn enable_telnet(args: EnableTelnetArgs) -> Task {
    Task::EnableTelnet {
        device: device_ref(args.target),
        code: args.code,
    }
}

pub fn enable_ssh(args: EnableSshArgs) -> Task {
    Task::EnableSsh {
        device: device_ref(args.target),
        public_key: args.pubkey,
    }
}

pub fn reset_password(args: ResetPasswordArgs) -> Result<Task, CliError> {
    let password = if args.new_password == PROMPT_SENTINEL {
        prompt_password(&format!("New password for {}: ", args.user))?
    } else {
        SecretString::from(args.new_password)
    };
    Ok(Task::ResetPassword {
        device: device_ref(args.target),
        username: args.user,
        password,
    })
}

#[derive(Serialize)]
struct Applied<'a> {
    action: &'a str,
    tenant: &'a str,
    device: &'a str,
}

pub fn report(action: &str, device: &DeviceRef, global: &GlobalOpts) -> Result<(), CliError> {
    let applied = Applied {
        action,
        tenant: &device.tenant,
        device: &device.name,
    };
    let out = render_single(
        &global.output,
        &applied,
        |a| format!("{}: done on {} (tenant {})", a.action, a.device, a.tenant),
        |a| a.device.to_owned(),
    )?;
    print_output(&out, global.quiet);
    Ok(())
}
