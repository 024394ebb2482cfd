use bitcoin::{
    Amount, OutPoint, ScriptBuf, Sequence, Transaction, TxIn, TxOut, Witness,
};
use ordfs_outpoint::Origin;
use tracing::{debug, info};

use crate::{
    collaborators::{Broadcaster, InputSigner},
    errors::{FundingError, FundingResult},
    params::FundingParams,
    pool::{SpendableOutput, UtxoPool},
};

/// A transaction with inputs and change added but not yet signed.
#[derive(Clone, Debug)]
pub struct FundedTx {
    tx: Transaction,
    inputs: Vec<SpendableOutput>,
    fee: u64,
    change_outputs: usize,
}

impl FundedTx {
    /// The funded, unsigned transaction.
    pub fn tx(&self) -> &Transaction {
        &self.tx
    }

    /// Outputs spent by each input, in input order.
    pub fn inputs(&self) -> &[SpendableOutput] {
        &self.inputs
    }

    /// Spent outputs as they appear in their creating transactions.
    pub fn parents(&self) -> Vec<TxOut> {
        self.inputs.iter().map(SpendableOutput::to_txout).collect()
    }

    /// Inputs minus outputs, sats.
    pub fn fee(&self) -> u64 {
        self.fee
    }

    /// Number of change outputs that were appended.
    pub fn change_outputs(&self) -> usize {
        self.change_outputs
    }

    /// Unwraps the transaction.
    pub fn into_tx(self) -> Transaction {
        self.tx
    }
}

/// Adds inputs and change to transactions, paying change to one script.
#[derive(Clone, Debug)]
pub struct FundingEngine {
    params: FundingParams,
    change_script: ScriptBuf,
}

impl FundingEngine {
    /// Creates an engine after validating `params`.
    pub fn new(params: FundingParams, change_script: ScriptBuf) -> FundingResult<Self> {
        params.validate()?;
        Ok(Self {
            params,
            change_script,
        })
    }

    /// Returns the funding params.
    pub fn params(&self) -> &FundingParams {
        &self.params
    }

    /// Script that change outputs pay to.
    pub fn change_script(&self) -> &ScriptBuf {
        &self.change_script
    }

    /// Selects inputs for `tx` from the front of `pool` and appends change.
    ///
    /// `tx` is expected to carry only outputs.  Each selected input adds
    /// `input_size` to the size estimate and the fee is recomputed from it.
    /// If the pool runs dry first, the selected entries are put back and
    /// [`FundingError::InsufficientFunds`] is returned; an amount overflow
    /// also puts them back.
    pub fn fund(&self, mut tx: Transaction, pool: &mut UtxoPool) -> FundingResult<FundedTx> {
        debug_assert!(tx.input.is_empty(), "funding a tx that already has inputs");
        let params = &self.params;

        let mut size = tx.base_size();
        let mut sats_out = tx
            .output
            .iter()
            .try_fold(0u64, |acc, o| acc.checked_add(o.value.to_sat()))
            .ok_or(FundingError::AmountOverflow)?;

        let mut selected = Vec::new();
        let (sats_in, mut fee) =
            match self.select_inputs(sats_out, &mut size, pool, &mut selected) {
                Ok(totals) => totals,
                Err(e) => {
                    pool.restore_front(selected);
                    return Err(e);
                }
            };

        tx.input = selected
            .iter()
            .map(|utxo| TxIn {
                previous_output: utxo.outpoint.into(),
                script_sig: ScriptBuf::new(),
                sequence: Sequence::MAX,
                witness: Witness::new(),
            })
            .collect();

        let output_fee = params.output_fee();
        let mut change_outputs = 0;
        let mut change = sats_in.saturating_sub(sats_out.saturating_add(fee + output_fee));

        while change > params.dust_limit {
            let split = change > params.split_amount.saturating_add(output_fee)
                && change_outputs + 1 < params.max_change_outputs;

            size += params.output_size;
            fee = params.fee_for_size(size);
            let value = if split {
                params.split_amount
            } else {
                sats_in.saturating_sub(sats_out.saturating_add(fee))
            };

            debug!(value, split, "added change output");
            tx.output.push(TxOut {
                value: Amount::from_sat(value),
                script_pubkey: self.change_script.clone(),
            });
            sats_out = sats_out.saturating_add(value);
            change_outputs += 1;

            change = if split {
                sats_in.saturating_sub(sats_out.saturating_add(fee + output_fee))
            } else {
                0
            };
        }

        let fee = sats_in.saturating_sub(sats_out);
        info!(
            inputs = selected.len(),
            outputs = tx.output.len(),
            %fee,
            %size,
            "funded transaction"
        );

        Ok(FundedTx {
            tx,
            inputs: selected,
            fee,
            change_outputs,
        })
    }

    /// Pops entries off `pool` into `selected` until they cover `sats_out`
    /// plus the fee at the grown size.  Returns total input value and fee.
    fn select_inputs(
        &self,
        sats_out: u64,
        size: &mut usize,
        pool: &mut UtxoPool,
        selected: &mut Vec<SpendableOutput>,
    ) -> FundingResult<(u64, u64)> {
        let params = &self.params;
        let mut fee = params.fee_for_size(*size);
        let mut sats_in = 0u64;

        loop {
            let needed = sats_out
                .checked_add(fee)
                .ok_or(FundingError::AmountOverflow)?;
            if sats_in >= needed {
                return Ok((sats_in, fee));
            }

            let Some(utxo) = pool.pop_front() else {
                return Err(FundingError::InsufficientFunds {
                    needed,
                    available: sats_in,
                });
            };

            debug!(outpoint = %utxo.outpoint, value = utxo.value, "selected input");
            let value = utxo.value;
            selected.push(utxo);
            sats_in = sats_in
                .checked_add(value)
                .ok_or(FundingError::AmountOverflow)?;
            *size += params.input_size;
            fee = params.fee_for_size(*size);
        }
    }

    /// Appends every output of `tx` after the first to the back of `pool`.
    pub fn replenish(&self, pool: &mut UtxoPool, tx: &Transaction) {
        let txid = tx.compute_txid();
        for (vout, out) in tx.output.iter().enumerate().skip(1) {
            let outpoint = Origin::from(OutPoint {
                txid,
                vout: vout as u32,
            });
            pool.push_back(SpendableOutput::new(
                outpoint,
                out.script_pubkey.clone(),
                out.value.to_sat(),
            ));
        }
    }

    /// Funds, signs and broadcasts `tx`, then puts its change into `pool`.
    ///
    /// If signing fails the selected inputs go back to the front of the pool.
    /// A broadcast failure leaves them out, since the caller can't tell
    /// whether they were spent and should refresh the pool before retrying.
    pub async fn fund_sign_broadcast(
        &self,
        tx: Transaction,
        pool: &mut UtxoPool,
        signer: &impl InputSigner,
        broadcaster: &impl Broadcaster,
    ) -> FundingResult<Transaction> {
        let mut funded = self.fund(tx, pool)?;

        if let Err(e) = sign_funded(&mut funded, signer) {
            pool.restore_front(funded.inputs);
            return Err(e);
        }

        let parents = funded.parents();
        broadcaster
            .submit(&funded.tx, &parents)
            .await
            .map_err(FundingError::Broadcast)?;

        let txid = funded.tx.compute_txid();
        info!(%txid, fee = funded.fee, "broadcast transaction");

        self.replenish(pool, &funded.tx);
        Ok(funded.into_tx())
    }
}

/// Attaches an unlock script to every input of `funded`.
///
/// All unlock scripts are produced against the unsigned transaction before
/// any is attached, so every signature commits to the same bytes.
pub fn sign_funded(funded: &mut FundedTx, signer: &impl InputSigner) -> FundingResult<()> {
    let unlocks = funded
        .inputs
        .iter()
        .enumerate()
        .map(|(index, utxo)| {
            signer
                .sign_input(&funded.tx, index, &utxo.to_txout())
                .map_err(|err| FundingError::Signer { index, err })
        })
        .collect::<FundingResult<Vec<_>>>()?;

    for (txin, unlock) in funded.tx.input.iter_mut().zip(unlocks) {
        txin.script_sig = unlock;
    }

    Ok(())
}
