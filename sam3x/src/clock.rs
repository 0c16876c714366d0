//! System clock setup.

use sam3x8e::Peripherals as DevicePeripherals;

/// System (master) clock speed in Hertz.
pub const SPEED: u32 = 84_000_000;

/// Write key of `CKGR_MOR`.
const MOR_KEY: u8 = 0x37;

/// Setup of the system clock.
///
/// Assumes a `12Mhz` external crystal is used: PLLA runs at 168MHz, the master
/// clock at half of it.
pub unsafe fn init() {
    let dp = DevicePeripherals::steal();

    // Four wait states for both flash banks at 84MHz.
    dp.EFC0.fmr.modify(|_, w| w.fws().bits(4));
    dp.EFC1.fmr.modify(|_, w| w.fws().bits(4));

    // Start the crystal oscillator, unless it already drives the main clock.
    if dp.PMC.ckgr_mor.read().moscsel().bit_is_clear() {
        dp.PMC.ckgr_mor.write(|w| {
            w.key().bits(MOR_KEY);
            // Startup time: 8 * 8 slow clock cycles.
            w.moscxtst().bits(0x08);
            w.moscrcen().set_bit();
            w.moscxten().set_bit()
        });
        while dp.PMC.pmc_sr.read().moscxts().bit_is_clear() {}
    }

    // Switch main clock to the crystal.
    dp.PMC.ckgr_mor.write(|w| {
        w.key().bits(MOR_KEY);
        w.moscxtst().bits(0x08);
        w.moscrcen().set_bit();
        w.moscxten().set_bit();
        w.moscsel().set_bit()
    });
    while dp.PMC.pmc_sr.read().moscsels().bit_is_clear() {}
    dp.PMC.pmc_mckr.modify(|_, w| w.css().main_clk());
    while dp.PMC.pmc_sr.read().mckrdy().bit_is_clear() {}

    // PLLA: 12MHz * (13 + 1) / 1.
    dp.PMC.ckgr_pllar.write(|w| {
        w.one().set_bit();
        w.mula().bits(0x0D);
        w.pllacount().bits(0x3F);
        w.diva().bits(0x01)
    });
    while dp.PMC.pmc_sr.read().locka().bit_is_clear() {}

    // Prescaler first, then switch to PLLA.
    dp.PMC.pmc_mckr.write(|w| {
        w.pres().clk_2();
        w.css().main_clk()
    });
    while dp.PMC.pmc_sr.read().mckrdy().bit_is_clear() {}
    dp.PMC.pmc_mckr.modify(|_, w| w.css().plla_clk());
    while dp.PMC.pmc_sr.read().mckrdy().bit_is_clear() {}
}

/// Enable the peripheral clock of the PWM controller (peripheral id 36).
pub unsafe fn enable_pwm() {
    let dp = DevicePeripherals::steal();

    dp.PMC.pmc_pcer1.write(|w| w.pid36().set_bit());
    while dp.PMC.pmc_pcsr1.read().pid36().bit_is_clear() {}
}
